//! 전략 설정, 하위 주문, 실행 통계 모델

pub mod child_order;
pub mod execution_stats;
pub mod strategy_config;
