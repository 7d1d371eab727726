//! VWAP 기반 실행 전략
//!
//! 거래량 프로필 비율에 따라 슬라이스 크기를 결정하는 전략

use crate::models::execution_stats::ExecutionStats;
use crate::models::strategy_config::DEFAULT_VWAP_BUCKETS;
use crate::strategies::ExecutionStrategy;

/// VWAP 실행 전략
pub struct VwapStrategy {
    /// 전략 이름
    name: String,
    /// 전략 설명
    description: String,
    /// 정규화된 구간별 거래량 비율 (합계 1.0)
    volume_profile: Vec<f64>,
}

impl VwapStrategy {
    /// 새 VWAP 전략 생성
    pub fn new(name: &str, volume_profile: &[f64]) -> Self {
        VwapStrategy {
            name: format!("VWAP-{}", name),
            description: "Volume Weighted Average Price based execution strategy".to_string(),
            volume_profile: normalize_profile(volume_profile),
        }
    }

    pub fn volume_profile(&self) -> &[f64] {
        &self.volume_profile
    }
}

/// 거래량 프로필 정규화
///
/// 데이터가 없거나 거래량 합계가 0이면 균등 분배
fn normalize_profile(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();

    if weights.is_empty() || total <= 0.0 {
        return vec![1.0 / DEFAULT_VWAP_BUCKETS as f64; DEFAULT_VWAP_BUCKETS];
    }

    weights.iter()
      .map(|w| if w.is_finite() && *w > 0.0 { w / total } else { 0.0 })
      .collect()
}

impl ExecutionStrategy for VwapStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    /// 비중이 0인 구간은 건너뛰고 다음 양수 구간을 사용
    fn nominal_size(&self, total_volume: f64, stats: &ExecutionStats) -> f64 {
        let len = self.volume_profile.len();
        let start = stats.orders_executed as usize % len;
        let weight = (0..len)
          .map(|offset| self.volume_profile[(start + offset) % len])
          .find(|w| *w > 0.0)
          .unwrap_or(0.0);
        total_volume * weight
    }
}
