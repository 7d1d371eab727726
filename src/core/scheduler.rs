/**
* filename : scheduler
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::slice_generator::generate_slice;
use crate::error::TradingError;
use crate::models::child_order::ChildOrder;
use crate::models::execution_stats::{ExecutionStats, HaltReason, SchedulerState, StrategySnapshot};
use crate::models::strategy_config::StrategyConfig;
use crate::strategies::{self, ExecutionStrategy};
use crate::utils::logging;

/// 전략 한 개의 실행 상태 머신
///
/// 모든 변경은 `tick` 과 제어 메서드를 통해서만 일어난다. 시간은 호출자가
/// 밀리초 단위로 넘겨준다.
pub struct ExecutionScheduler {
  /// 실행 설정
  config: StrategyConfig,
  /// 크기/주기 정책
  strategy: Box<dyn ExecutionStrategy>,
  /// 현재 상태
  state: SchedulerState,
  /// 마지막 정지 사유
  halt_reason: Option<HaltReason>,
  /// 실행 통계
  stats: ExecutionStats,
  /// 현재 노출 중인 슬라이스
  active: VecDeque<ChildOrder>,
  /// 지터용 난수 생성기
  rng: StdRng,
  /// 다음 슬라이스 순번
  sequence: u64,
  /// 마지막 시작/재개 시각
  resumed_at: Option<i64>,
  /// 일시정지 이전까지 누적된 실행 시간
  elapsed_running_ms: i64,
}

impl ExecutionScheduler {
  /// 새 스케줄러 생성
  pub fn new(config: StrategyConfig) -> Result<Self, TradingError> {
    Self::with_rng(config, StdRng::from_entropy())
  }

  /// 고정 시드 스케줄러 생성
  pub fn with_seed(config: StrategyConfig, seed: u64) -> Result<Self, TradingError> {
    Self::with_rng(config, StdRng::seed_from_u64(seed))
  }

  fn with_rng(mut config: StrategyConfig, rng: StdRng) -> Result<Self, TradingError> {
    config.validate()?;
    config.enabled = false;
    let strategy = strategies::from_config(&config);

    Ok(ExecutionScheduler {
      config,
      strategy,
      state: SchedulerState::Stopped,
      halt_reason: None,
      stats: ExecutionStats::default(),
      active: VecDeque::new(),
      rng,
      sequence: 0,
      resumed_at: None,
      elapsed_running_ms: 0,
    })
  }

  pub fn id(&self) -> &str {
    &self.config.id
  }

  pub fn config(&self) -> &StrategyConfig {
    &self.config
  }

  pub fn state(&self) -> SchedulerState {
    self.state
  }

  pub fn halt_reason(&self) -> Option<HaltReason> {
    self.halt_reason
  }

  pub fn stats(&self) -> &ExecutionStats {
    &self.stats
  }

  pub fn active_slices(&self) -> impl Iterator<Item = &ChildOrder> {
    self.active.iter()
  }

  /// 실행 시작 또는 재개. 상태가 바뀌면 true
  pub fn start(&mut self, now_ms: i64) -> bool {
    match self.state {
      SchedulerState::Running => false,
      SchedulerState::Paused => {
        self.state = SchedulerState::Running;
        self.resumed_at = Some(now_ms);
        log::info!("전략 재개: {} - 실행 수량: {}", self.strategy.name(), self.stats.executed_volume);
        true
      },
      SchedulerState::Stopped => {
        self.reset();
        self.state = SchedulerState::Running;
        self.halt_reason = None;
        self.config.enabled = true;
        self.resumed_at = Some(now_ms);
        logging::log_strategy_start(self.strategy.name(), &self.config.id, self.config.total_volume);
        true
      }
    }
  }

  /// 타이머만 멈추고 통계는 유지
  pub fn pause(&mut self, now_ms: i64) -> bool {
    if self.state != SchedulerState::Running {
      return false;
    }

    self.accumulate_running_time(now_ms);
    self.state = SchedulerState::Paused;
    self.stats.next_tick_at = None;
    logging::log_strategy_paused(self.strategy.name(), &self.stats);
    true
  }

  /// 타이머를 멈추고 노출 슬라이스 취소 후 통계 초기화
  ///
  /// 이미 정지 상태라면 상태 머신은 그대로 두고 남아 있는 완료 통계만 지운다.
  pub fn stop(&mut self) -> bool {
    if self.state == SchedulerState::Stopped {
      self.stats = ExecutionStats::default();
      return false;
    }

    for slice in self.active.iter_mut() {
      if let Err(e) = slice.cancel() {
        logging::log_error("slice cancel", &e);
      }
    }

    self.halt(HaltReason::Stopped);
    self.reset();
    true
  }

  /// 정지 상태에서만 설정 변경 허용
  pub fn update_config(&mut self, mut config: StrategyConfig) -> Result<(), TradingError> {
    if self.state != SchedulerState::Stopped {
      return Err(TradingError::StrategyRunning(self.config.id.clone()));
    }

    config.id = self.config.id.clone();
    config.enabled = false;
    config.validate()?;

    self.strategy = strategies::from_config(&config);
    self.config = config;
    self.halt_reason = None;
    self.reset();
    Ok(())
  }

  /// 다음 틱까지 대기 시간
  pub fn next_interval(&mut self) -> Duration {
    let base = Duration::from_millis(self.config.interval_ms);
    self.strategy.tick_interval(base, self.config.variance_percent, &mut self.rng)
  }

  pub fn set_next_tick_at(&mut self, next_tick_at: Option<i64>) {
    self.stats.next_tick_at = next_tick_at;
  }

  /// 한 틱 실행. 이번 틱에 생성된 슬라이스를 반환
  pub fn tick(&mut self, now_ms: i64) -> Result<Vec<ChildOrder>, TradingError> {
    if self.state != SchedulerState::Running {
      return Ok(Vec::new());
    }

    if self.is_expired(now_ms) {
      self.cancel_displayed()?;
      self.halt(HaltReason::Expired);
      return Ok(Vec::new());
    }

    // 이전 틱에 노출된 슬라이스 체결 처리
    self.retire_displayed()?;

    let total_volume = self.config.total_volume;
    let window = self.strategy.display_window();
    let mut emitted = Vec::new();

    for _ in 0..window.unwrap_or(1) {
      let remaining = self.stats.remaining_volume(total_volume);
      if remaining <= 0.0 {
        break;
      }

      let nominal = self.strategy.nominal_size(total_volume, &self.stats);
      let mut slice = generate_slice(
        self.strategy.as_ref(),
        &self.config,
        nominal,
        remaining,
        self.sequence,
        &mut self.rng,
      );

      if slice.is_empty() {
        break;
      }

      self.sequence += 1;
      slice.activate()?;

      if slice.displayed_size >= remaining {
        self.stats.executed_volume = total_volume;
      } else {
        self.stats.executed_volume += slice.displayed_size;
      }
      self.stats.orders_executed += 1;
      logging::log_slice_emitted(&slice, &self.stats);

      if window.is_some() {
        self.active.push_back(slice.clone());
      } else {
        slice.fill()?;
      }
      emitted.push(slice);
    }

    self.stats.active_slices = self.active.len();

    if self.stats.executed_volume >= total_volume {
      self.retire_displayed()?;
      self.halt(HaltReason::Completed);
    }

    Ok(emitted)
  }

  /// 현재 상태 스냅샷
  pub fn snapshot(&self) -> StrategySnapshot {
    StrategySnapshot {
      config: self.config.clone(),
      state: self.state,
      halt_reason: self.halt_reason,
      stats: self.stats.clone(),
      progress_percent: self.stats.progress_percent(self.config.total_volume),
      active: self.active.iter().cloned().collect(),
    }
  }

  fn reset(&mut self) {
    self.stats = ExecutionStats::default();
    self.active.clear();
    self.sequence = 0;
    self.resumed_at = None;
    self.elapsed_running_ms = 0;
  }

  fn halt(&mut self, reason: HaltReason) {
    self.state = SchedulerState::Stopped;
    self.halt_reason = Some(reason);
    self.config.enabled = false;
    self.resumed_at = None;
    self.stats.next_tick_at = None;
    logging::log_strategy_halt(self.strategy.name(), reason, &self.stats);
  }

  fn retire_displayed(&mut self) -> Result<(), TradingError> {
    while let Some(mut slice) = self.active.pop_front() {
      slice.fill()?;
    }
    self.stats.active_slices = 0;
    Ok(())
  }

  fn cancel_displayed(&mut self) -> Result<(), TradingError> {
    while let Some(mut slice) = self.active.pop_front() {
      slice.cancel()?;
    }
    self.stats.active_slices = 0;
    Ok(())
  }

  fn accumulate_running_time(&mut self, now_ms: i64) {
    if let Some(resumed_at) = self.resumed_at.take() {
      self.elapsed_running_ms += (now_ms - resumed_at).max(0);
    }
  }

  fn is_expired(&self, now_ms: i64) -> bool {
    let Some(minutes) = self.config.duration_minutes else {
      return false;
    };
    let running = self.resumed_at.map_or(0, |resumed_at| (now_ms - resumed_at).max(0));
    self.elapsed_running_ms + running >= (minutes as i64) * 60_000
  }
}
