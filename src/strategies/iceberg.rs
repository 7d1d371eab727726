//! Iceberg 전략
//!
//! 대량 주문을 일부만 노출하면서 여러 슬라이스를 순환시키는 전략

use crate::models::execution_stats::ExecutionStats;
use crate::strategies::ExecutionStrategy;

/// Iceberg 실행 전략
pub struct IcebergStrategy {
    /// 전략 이름
    name: String,
    /// 전략 설명
    description: String,
    /// 시장에 노출할 부분 수량
    display_size: f64,
    /// 동시에 노출되는 최대 슬라이스 수
    max_active_slices: usize,
    /// 노출 수량 대비 숨김 수량 비율
    secrecy_factor: f64,
}

impl IcebergStrategy {
    /// 새 Iceberg 전략 생성
    pub fn new(name: &str, display_size: f64, max_active_slices: usize, secrecy_factor: f64) -> Self {
        IcebergStrategy {
            name: format!("Iceberg-{}", name),
            description: "Hidden large order execution strategy".to_string(),
            display_size,
            max_active_slices: max_active_slices.max(1),
            secrecy_factor: secrecy_factor.max(0.0),
        }
    }
}

impl ExecutionStrategy for IcebergStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn nominal_size(&self, _total_volume: f64, _stats: &ExecutionStats) -> f64 {
        self.display_size
    }

    fn size_ceiling(&self) -> Option<f64> {
        Some(self.display_size)
    }

    fn hidden_size(&self, displayed_size: f64) -> Option<f64> {
        Some((displayed_size * self.secrecy_factor).floor())
    }

    fn display_window(&self) -> Option<usize> {
        Some(self.max_active_slices)
    }
}
