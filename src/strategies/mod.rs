pub mod vwap;
pub mod iceberg;
pub mod twap;

use rand::RngCore;
use std::time::Duration;

use crate::models::execution_stats::ExecutionStats;
use crate::models::strategy_config::{AlgoParams, StrategyConfig};

/// 주문 실행 전략 인터페이스
///
/// 슬라이스 크기와 틱 주기 정책만 정의하며, 상태는 스케줄러가 소유한다.
pub trait ExecutionStrategy: Send + Sync {
    /// 전략 이름 가져오기
    fn name(&self) -> &str;

    /// 전략 설명 가져오기
    fn description(&self) -> &str;

    /// 지터 적용 전 다음 슬라이스 크기
    fn nominal_size(&self, total_volume: f64, stats: &ExecutionStats) -> f64;

    /// 다음 틱까지의 대기 시간
    fn tick_interval(&self, base: Duration, _variance_percent: f64, _rng: &mut dyn RngCore) -> Duration {
        base
    }

    /// 슬라이스 크기 상한 (max_child_size 외 추가 제한)
    fn size_ceiling(&self) -> Option<f64> {
        None
    }

    /// 노출 수량에 대한 숨김 수량
    fn hidden_size(&self, _displayed_size: f64) -> Option<f64> {
        None
    }

    /// 동시에 노출 유지할 슬라이스 수. None이면 일회성 주문
    fn display_window(&self) -> Option<usize> {
        None
    }
}

/// 설정의 알고리즘 파라미터로 전략 생성
pub fn from_config(config: &StrategyConfig) -> Box<dyn ExecutionStrategy> {
    match &config.algo {
        AlgoParams::Vwap { volume_profile } => Box::new(VwapStrategy::new(&config.name, volume_profile)),
        AlgoParams::Twap { num_slices } => Box::new(TwapStrategy::new(&config.name, *num_slices)),
        AlgoParams::Iceberg { display_size, max_active_slices, secrecy_factor } => Box::new(
            IcebergStrategy::new(&config.name, *display_size, *max_active_slices, *secrecy_factor),
        ),
    }
}

// 핵심 전략 재노출
pub use vwap::VwapStrategy;
pub use iceberg::IcebergStrategy;
pub use twap::TwapStrategy;
