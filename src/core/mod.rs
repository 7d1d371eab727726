//! 주문 실행 스케줄러의 핵심 구현체

pub mod slice_generator;
pub mod scheduler;
pub mod scheduler_task;
pub mod strategy_manager;

pub use scheduler::ExecutionScheduler;
pub use scheduler_task::SchedulerHandle;
pub use strategy_manager::StrategyManager;
