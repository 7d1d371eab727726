use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::TradingError;

#[derive(Debug, Clone, Serialize, Deserialize, Eq, Hash, PartialEq)]
pub struct SliceId(pub String);

impl fmt::Display for SliceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 슬라이스 생명주기: Pending → Active → Filled, 또는 Cancelled
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SliceStatus {
    Pending,
    Active,
    Filled,
    Cancelled,
}

/// 실행 알고리즘이 생성한 하위 주문
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildOrder {
    pub id: SliceId,
    pub strategy_id: String,
    pub sequence: u64,
    pub displayed_size: f64,
    pub hidden_size: Option<f64>,
    pub status: SliceStatus,
    pub created_at: i64,
}

impl ChildOrder {
    pub fn new(strategy_id: impl Into<String>, sequence: u64, displayed_size: f64) -> Self {
        ChildOrder {
            id: SliceId(Uuid::new_v4().to_string()),
            strategy_id: strategy_id.into(),
            sequence,
            displayed_size,
            hidden_size: None,
            status: SliceStatus::Pending,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_hidden_size(mut self, hidden_size: f64) -> Self {
        self.hidden_size = Some(hidden_size);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.displayed_size <= 0.0
    }

    /// 노출 + 숨김 수량
    pub fn total_size(&self) -> f64 {
        self.displayed_size + self.hidden_size.unwrap_or(0.0)
    }

    pub fn activate(&mut self) -> Result<(), TradingError> {
        self.transition(SliceStatus::Active)
    }

    pub fn fill(&mut self) -> Result<(), TradingError> {
        self.transition(SliceStatus::Filled)
    }

    pub fn cancel(&mut self) -> Result<(), TradingError> {
        self.transition(SliceStatus::Cancelled)
    }

    fn transition(&mut self, next: SliceStatus) -> Result<(), TradingError> {
        let allowed = matches!(
            (self.status, next),
            (SliceStatus::Pending, SliceStatus::Active)
                | (SliceStatus::Active, SliceStatus::Filled)
                | (SliceStatus::Pending, SliceStatus::Cancelled)
                | (SliceStatus::Active, SliceStatus::Cancelled)
        );

        if !allowed {
            return Err(TradingError::InvalidTransition(
                format!("{} {:?} -> {:?}", self.id, self.status, next)
            ));
        }

        self.status = next;
        Ok(())
    }
}
