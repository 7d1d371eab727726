//! 주문 실행 스케줄러 라이브러리
//!
//! VWAP, TWAP, Iceberg 알고리즘으로 대량 주문을 하위 주문으로 분할하는
//! 시뮬레이션 스케줄러입니다.

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod strategies;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::TradingError;
pub use crate::core::{ExecutionScheduler, SchedulerHandle, StrategyManager};
pub use crate::models::child_order::{ChildOrder, SliceId, SliceStatus};
pub use crate::models::execution_stats::{ExecutionStats, HaltReason, SchedulerState, StrategySnapshot};
pub use crate::models::strategy_config::{AlgoParams, StrategyConfig};
pub use crate::strategies::ExecutionStrategy;

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, TradingError>;
