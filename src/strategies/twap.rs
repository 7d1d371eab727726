//! TWAP 전략
//!
//! 시간 가중 평균 가격 기반 주문 실행 전략

use rand::RngCore;
use std::time::Duration;

use crate::core::slice_generator::jitter_factor;
use crate::models::execution_stats::ExecutionStats;
use crate::strategies::ExecutionStrategy;

/// TWAP 실행 전략
pub struct TwapStrategy {
    /// 전략 이름
    name: String,
    /// 전략 설명
    description: String,
    /// 분할 수
    num_slices: u32,
}

impl TwapStrategy {
    /// 새 TWAP 전략 생성
    pub fn new(name: &str, num_slices: u32) -> Self {
        TwapStrategy {
            name: format!("TWAP-{}", name),
            description: "Time Weighted Average Price based execution strategy".to_string(),
            num_slices: num_slices.max(1),
        }
    }
}

impl ExecutionStrategy for TwapStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn nominal_size(&self, total_volume: f64, _stats: &ExecutionStats) -> f64 {
        total_volume / self.num_slices as f64
    }

    /// 주기 자체도 ±variance 만큼 흔든다
    fn tick_interval(&self, base: Duration, variance_percent: f64, rng: &mut dyn RngCore) -> Duration {
        let factor = jitter_factor(variance_percent, rng);
        let millis = (base.as_millis() as f64 * factor).round().max(1.0);
        Duration::from_millis(millis as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_twap_strategy() {
        let strategy = TwapStrategy::new("BTCUSDT", 5);
        assert_eq!(strategy.name(), "TWAP-BTCUSDT");
        assert_eq!(strategy.nominal_size(1.0, &ExecutionStats::default()), 0.2);

        // 0 분할은 1로 처리
        let single = TwapStrategy::new("BTCUSDT", 0);
        assert_eq!(single.nominal_size(500.0, &ExecutionStats::default()), 500.0);
    }

    #[test]
    fn test_twap_interval_jitter_bounds() {
        let strategy = TwapStrategy::new("BTCUSDT", 5);
        let mut rng = StdRng::seed_from_u64(7);
        let base = Duration::from_millis(1000);

        for _ in 0..100 {
            let interval = strategy.tick_interval(base, 20.0, &mut rng);
            assert!(interval >= Duration::from_millis(800));
            assert!(interval <= Duration::from_millis(1200));
        }

        assert_eq!(strategy.tick_interval(base, 0.0, &mut rng), base);
    }
}
