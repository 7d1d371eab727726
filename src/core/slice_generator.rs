//! 슬라이스 생성기
//!
//! 전략의 목표 크기에 지터를 적용하고 하위 주문 한 개를 만든다.

use rand::{Rng, RngCore};

use crate::models::child_order::ChildOrder;
use crate::models::strategy_config::StrategyConfig;
use crate::strategies::ExecutionStrategy;

/// ±variance_percent 범위의 균등 분포 배수 (1.0 중심)
pub fn jitter_factor(variance_percent: f64, rng: &mut dyn RngCore) -> f64 {
  let spread = (variance_percent / 100.0).clamp(0.0, 1.0);
  if spread <= 0.0 {
    return 1.0;
  }
  1.0 + rng.gen_range(-spread..=spread)
}

/// 하위 주문 한 개 생성
///
/// 남은 수량이 0 이하이면 크기 0의 슬라이스를 반환한다.
pub fn generate_slice(
  strategy: &dyn ExecutionStrategy,
  config: &StrategyConfig,
  nominal_size: f64,
  remaining_volume: f64,
  sequence: u64,
  rng: &mut dyn RngCore,
) -> ChildOrder {
  let size = slice_size(strategy, config, nominal_size, remaining_volume, rng);
  let slice = ChildOrder::new(config.id.clone(), sequence, size);

  match strategy.hidden_size(size) {
    Some(hidden) if size > 0.0 => slice.with_hidden_size(hidden),
    _ => slice,
  }
}

fn slice_size(
  strategy: &dyn ExecutionStrategy,
  config: &StrategyConfig,
  nominal_size: f64,
  remaining_volume: f64,
  rng: &mut dyn RngCore,
) -> f64 {
  if remaining_volume <= 0.0 || nominal_size <= 0.0 {
    return 0.0;
  }

  let ceiling = strategy.size_ceiling()
    .map_or(config.max_child_size, |c| c.min(config.max_child_size));
  let floor = config.min_child_size.min(ceiling);

  let jittered = nominal_size * jitter_factor(config.variance_percent, rng);
  jittered.clamp(floor, ceiling).min(remaining_volume).max(0.0)
}
