use serde::{Deserialize, Serialize};

use crate::models::child_order::ChildOrder;
use crate::models::strategy_config::StrategyConfig;

/// 스케줄러 실행 통계 (스케줄러 루프만 변경)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExecutionStats {
    pub executed_volume: f64,
    pub orders_executed: u64,
    pub active_slices: usize,
    pub next_tick_at: Option<i64>,
}

impl ExecutionStats {
    /// 진행률 (%)
    pub fn progress_percent(&self, total_volume: f64) -> f64 {
        if total_volume <= 0.0 {
            return 0.0;
        }
        (self.executed_volume / total_volume * 100.0).min(100.0)
    }

    pub fn remaining_volume(&self, total_volume: f64) -> f64 {
        (total_volume - self.executed_volume).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
    Paused,
}

/// 마지막 정지 사유
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HaltReason {
    Completed,
    Expired,
    Stopped,
}

/// 표시 계층에 공개되는 읽기 전용 상태
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategySnapshot {
    pub config: StrategyConfig,
    pub state: SchedulerState,
    pub halt_reason: Option<HaltReason>,
    pub stats: ExecutionStats,
    pub progress_percent: f64,
    pub active: Vec<ChildOrder>,
}
