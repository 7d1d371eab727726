/**
* filename : strategy_manager
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::collections::HashMap;

use crate::config::SchedulerDefaults;
use crate::core::scheduler::ExecutionScheduler;
use crate::core::scheduler_task::SchedulerHandle;
use crate::error::TradingError;
use crate::models::execution_stats::StrategySnapshot;
use crate::models::strategy_config::StrategyConfig;

// 전략 관리자 - 전략 인스턴스별 스케줄러 태스크 관리
pub struct StrategyManager {
  defaults: SchedulerDefaults,
  strategies: HashMap<String, SchedulerHandle>,
}

impl StrategyManager {
  pub fn new(defaults: SchedulerDefaults) -> Self {
    StrategyManager {
      defaults,
      strategies: HashMap::new(),
    }
  }

  pub fn defaults(&self) -> &SchedulerDefaults {
    &self.defaults
  }

  // 전략 추가 - 정지 상태로 태스크 생성
  pub fn add_strategy(&mut self, config: StrategyConfig) -> Result<StrategySnapshot, TradingError> {
    if self.strategies.contains_key(&config.id) {
      return Err(TradingError::DuplicateStrategy(format!("Strategy '{}' already exists", config.id)));
    }

    let scheduler = ExecutionScheduler::new(config)?;
    let handle = SchedulerHandle::spawn(scheduler);
    let snapshot = handle.snapshot();
    self.strategies.insert(handle.id().to_string(), handle);

    Ok(snapshot)
  }

  // 데모 전략 등록 (VWAP, TWAP, Iceberg)
  pub fn seed_demo_strategies(&mut self) -> Result<Vec<StrategySnapshot>, TradingError> {
    let demos = vec![
      StrategyConfig::vwap("VWAP Demo", &self.defaults).with_id("vwap-demo"),
      StrategyConfig::twap("TWAP Demo", &self.defaults).with_id("twap-demo"),
      StrategyConfig::iceberg("Iceberg Demo", &self.defaults).with_id("iceberg-demo"),
    ];

    demos.into_iter().map(|config| self.add_strategy(config)).collect()
  }

  // 전략 제거 - 태스크 종료까지 대기
  pub async fn remove_strategy(&mut self, id: &str) -> Result<(), TradingError> {
    let handle = self.strategies.remove(id)
      .ok_or_else(|| TradingError::StrategyNotFound(format!("Strategy '{}' not found", id)))?;

    handle.shutdown().await
  }

  pub async fn start(&self, id: &str) -> Result<StrategySnapshot, TradingError> {
    self.handle(id)?.start().await
  }

  pub async fn pause(&self, id: &str) -> Result<StrategySnapshot, TradingError> {
    self.handle(id)?.pause().await
  }

  pub async fn stop(&self, id: &str) -> Result<StrategySnapshot, TradingError> {
    self.handle(id)?.stop().await
  }

  // 설정 변경 - 정지 상태에서만 허용
  pub async fn update_config(&self, id: &str, config: StrategyConfig) -> Result<StrategySnapshot, TradingError> {
    self.handle(id)?.update_config(config).await
  }

  // 전략 상태 조회
  pub fn snapshot(&self, id: &str) -> Result<StrategySnapshot, TradingError> {
    Ok(self.handle(id)?.snapshot())
  }

  // 전략 목록 (id 순)
  pub fn list(&self) -> Vec<StrategySnapshot> {
    let mut snapshots: Vec<StrategySnapshot> = self.strategies.values()
      .map(|handle| handle.snapshot())
      .collect();
    snapshots.sort_by(|a, b| a.config.id.cmp(&b.config.id));
    snapshots
  }

  pub fn len(&self) -> usize {
    self.strategies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.strategies.is_empty()
  }

  // 모든 태스크 종료
  pub async fn dispose(&mut self) -> Result<(), TradingError> {
    for (_, handle) in self.strategies.drain() {
      handle.shutdown().await?;
    }
    Ok(())
  }

  fn handle(&self, id: &str) -> Result<&SchedulerHandle, TradingError> {
    self.strategies.get(id)
      .ok_or_else(|| TradingError::StrategyNotFound(format!("Strategy '{}' not found", id)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::execution_stats::SchedulerState;

  #[tokio::test]
  async fn test_add_and_control_strategy() {
    let mut manager = StrategyManager::new(SchedulerDefaults::default());
    let config = StrategyConfig::twap("TWAP", manager.defaults()).with_id("twap-1");

    let created = manager.add_strategy(config.clone()).unwrap();
    assert_eq!(created.state, SchedulerState::Stopped);
    assert!(!created.config.enabled);

    // 중복 id 거부
    assert!(matches!(manager.add_strategy(config), Err(TradingError::DuplicateStrategy(_))));

    let started = manager.start("twap-1").await.unwrap();
    assert_eq!(started.state, SchedulerState::Running);
    assert!(started.config.enabled);

    let paused = manager.pause("twap-1").await.unwrap();
    assert_eq!(paused.state, SchedulerState::Paused);

    manager.remove_strategy("twap-1").await.unwrap();
    assert!(manager.is_empty());
    assert!(matches!(manager.snapshot("twap-1"), Err(TradingError::StrategyNotFound(_))));
  }

  #[tokio::test]
  async fn test_seed_and_dispose() {
    let mut manager = StrategyManager::new(SchedulerDefaults::default());
    let seeded = manager.seed_demo_strategies().unwrap();
    assert_eq!(seeded.len(), 3);

    let ids: Vec<String> = manager.list().into_iter().map(|s| s.config.id).collect();
    assert_eq!(ids, vec!["iceberg-demo", "twap-demo", "vwap-demo"]);

    manager.dispose().await.unwrap();
    assert_eq!(manager.len(), 0);
  }
}
