//! 스케줄러 태스크
//!
//! 전략 인스턴스마다 하나의 tokio 태스크가 스케줄러를 독점 소유하고,
//! 제어 명령은 메일박스로, 상태는 watch 채널로 주고받는다.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::core::scheduler::ExecutionScheduler;
use crate::error::TradingError;
use crate::models::execution_stats::{SchedulerState, StrategySnapshot};
use crate::models::strategy_config::StrategyConfig;
use crate::utils::{current_timestamp_ms, logging};

const MAILBOX_CAPACITY: usize = 32;
const IDLE_WAIT: Duration = Duration::from_secs(3600);

type Reply<T> = oneshot::Sender<Result<T, TradingError>>;

enum Command {
  Start(Reply<StrategySnapshot>),
  Pause(Reply<StrategySnapshot>),
  Stop(Reply<StrategySnapshot>),
  UpdateConfig(StrategyConfig, Reply<StrategySnapshot>),
  Shutdown,
}

/// 태스크 기준 시각. tokio 시계를 따라 일시정지된 테스트 시간에서도 진행한다.
struct TaskClock {
  origin: Instant,
  origin_ms: i64,
}

impl TaskClock {
  fn new() -> Self {
    TaskClock {
      origin: Instant::now(),
      origin_ms: current_timestamp_ms(),
    }
  }

  fn now_ms(&self) -> i64 {
    self.origin_ms + self.origin.elapsed().as_millis() as i64
  }
}

/// 실행 중인 스케줄러 태스크에 대한 제어 핸들
pub struct SchedulerHandle {
  id: String,
  commands: mpsc::Sender<Command>,
  snapshots: watch::Receiver<StrategySnapshot>,
  task: JoinHandle<()>,
}

impl SchedulerHandle {
  /// 스케줄러를 새 태스크로 실행
  pub fn spawn(scheduler: ExecutionScheduler) -> Self {
    let id = scheduler.id().to_string();
    let (command_tx, command_rx) = mpsc::channel(MAILBOX_CAPACITY);
    let (snapshot_tx, snapshot_rx) = watch::channel(scheduler.snapshot());

    let task = tokio::spawn(run(scheduler, command_rx, snapshot_tx));

    SchedulerHandle {
      id,
      commands: command_tx,
      snapshots: snapshot_rx,
      task,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// 실행 시작/재개. 이미 실행 중이면 변화 없음
  pub async fn start(&self) -> Result<StrategySnapshot, TradingError> {
    self.request(Command::Start).await
  }

  /// 일시정지. 통계 유지
  pub async fn pause(&self) -> Result<StrategySnapshot, TradingError> {
    self.request(Command::Pause).await
  }

  /// 정지. 통계 초기화
  pub async fn stop(&self) -> Result<StrategySnapshot, TradingError> {
    self.request(Command::Stop).await
  }

  pub async fn update_config(&self, config: StrategyConfig) -> Result<StrategySnapshot, TradingError> {
    self.request(|reply| Command::UpdateConfig(config, reply)).await
  }

  /// 마지막으로 발행된 상태
  pub fn snapshot(&self) -> StrategySnapshot {
    self.snapshots.borrow().clone()
  }

  /// 틱마다 갱신되는 상태 구독
  pub fn subscribe(&self) -> watch::Receiver<StrategySnapshot> {
    self.snapshots.clone()
  }

  /// 태스크 종료 후 대기
  pub async fn shutdown(self) -> Result<(), TradingError> {
    // 이미 종료된 태스크면 전송 실패는 무시
    let _ = self.commands.send(Command::Shutdown).await;
    self.task
      .await
      .map_err(|e| TradingError::ChannelClosed(format!("{}: {}", self.id, e)))
  }

  async fn request<F>(&self, make: F) -> Result<StrategySnapshot, TradingError>
  where
    F: FnOnce(Reply<StrategySnapshot>) -> Command,
  {
    let (reply_tx, reply_rx) = oneshot::channel();
    self.commands
      .send(make(reply_tx))
      .await
      .map_err(|_| TradingError::ChannelClosed(self.id.clone()))?;

    reply_rx
      .await
      .map_err(|_| TradingError::ChannelClosed(self.id.clone()))?
  }
}

async fn run(
  mut scheduler: ExecutionScheduler,
  mut commands: mpsc::Receiver<Command>,
  snapshots: watch::Sender<StrategySnapshot>,
) {
  let clock = TaskClock::new();
  let mut next_tick: Option<Instant> = None;

  loop {
    let deadline = next_tick.unwrap_or_else(|| Instant::now() + IDLE_WAIT);

    tokio::select! {
      command = commands.recv() => {
        let Some(command) = command else { break };

        match command {
          Command::Start(reply) => {
            if scheduler.start(clock.now_ms()) {
              next_tick = Some(schedule_next(&mut scheduler, &clock));
            }
            let _ = reply.send(Ok(publish(&scheduler, &snapshots)));
          },
          Command::Pause(reply) => {
            if scheduler.pause(clock.now_ms()) {
              next_tick = None;
            }
            let _ = reply.send(Ok(publish(&scheduler, &snapshots)));
          },
          Command::Stop(reply) => {
            scheduler.stop();
            next_tick = None;
            let _ = reply.send(Ok(publish(&scheduler, &snapshots)));
          },
          Command::UpdateConfig(config, reply) => {
            let result = scheduler
              .update_config(config)
              .map(|_| publish(&scheduler, &snapshots));
            let _ = reply.send(result);
          },
          Command::Shutdown => break,
        }
      }
      _ = time::sleep_until(deadline), if next_tick.is_some() => {
        if let Err(e) = scheduler.tick(clock.now_ms()) {
          logging::log_error("scheduler tick", &e);
        }

        next_tick = if scheduler.state() == SchedulerState::Running {
          Some(schedule_next(&mut scheduler, &clock))
        } else {
          None
        };
        publish(&scheduler, &snapshots);
      }
    }
  }

  log::debug!("스케줄러 태스크 종료: {}", scheduler.id());
}

fn schedule_next(scheduler: &mut ExecutionScheduler, clock: &TaskClock) -> Instant {
  let wait = scheduler.next_interval();
  scheduler.set_next_tick_at(Some(clock.now_ms() + wait.as_millis() as i64));
  Instant::now() + wait
}

fn publish(scheduler: &ExecutionScheduler, snapshots: &watch::Sender<StrategySnapshot>) -> StrategySnapshot {
  let snapshot = scheduler.snapshot();
  snapshots.send_replace(snapshot.clone());
  snapshot
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::SchedulerDefaults;

  fn twap_config() -> StrategyConfig {
    StrategyConfig::twap("twap", &SchedulerDefaults::default())
      .with_total_volume(1000.0)
      .with_interval_ms(1000)
      .with_variance_percent(0.0)
  }

  #[tokio::test(start_paused = true)]
  async fn test_handle_runs_ticks_on_timer() {
    let scheduler = ExecutionScheduler::with_seed(twap_config(), 5).unwrap();
    let handle = SchedulerHandle::spawn(scheduler);

    let started = handle.start().await.unwrap();
    assert_eq!(started.state, SchedulerState::Running);
    assert!(started.stats.next_tick_at.is_some());

    time::sleep(Duration::from_millis(3500)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.stats.orders_executed, 3);
    assert_eq!(snapshot.stats.executed_volume, 300.0);

    handle.shutdown().await.unwrap();
  }

  #[tokio::test(start_paused = true)]
  async fn test_subscriber_sees_each_tick() {
    let scheduler = ExecutionScheduler::with_seed(twap_config(), 5).unwrap();
    let handle = SchedulerHandle::spawn(scheduler);
    let mut updates = handle.subscribe();

    handle.start().await.unwrap();
    assert_eq!(updates.borrow_and_update().state, SchedulerState::Running);

    updates.changed().await.unwrap();
    assert_eq!(updates.borrow_and_update().stats.orders_executed, 1);

    updates.changed().await.unwrap();
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.stats.orders_executed, 2);
    assert_eq!(snapshot.stats.executed_volume, 200.0);

    handle.pause().await.unwrap();
    assert_eq!(updates.borrow_and_update().state, SchedulerState::Paused);

    handle.shutdown().await.unwrap();
    // 태스크 종료 후에는 발행자가 사라짐
    assert!(updates.changed().await.is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn test_requests_fail_after_shutdown() {
    let scheduler = ExecutionScheduler::with_seed(twap_config(), 5).unwrap();
    let handle = SchedulerHandle::spawn(scheduler);
    let commands = handle.commands.clone();

    handle.shutdown().await.unwrap();

    let (reply_tx, _reply_rx) = oneshot::channel();
    assert!(commands.send(Command::Start(reply_tx)).await.is_err());
  }
}
