//! 스케줄러 관련 테스트
//!
//! 실행 통계 불변식과 제어 동작 시나리오 테스트

use rstest::rstest;
use xquant_exec::config::SchedulerDefaults;
use xquant_exec::core::ExecutionScheduler;
use xquant_exec::models::execution_stats::{ExecutionStats, HaltReason, SchedulerState};
use xquant_exec::models::strategy_config::StrategyConfig;

fn defaults() -> SchedulerDefaults {
  SchedulerDefaults::default()
}

fn config_for(kind: &str) -> StrategyConfig {
  let config = match kind {
    "vwap" => StrategyConfig::vwap("vwap", &defaults()),
    "twap" => StrategyConfig::twap("twap", &defaults()),
    _ => StrategyConfig::iceberg("iceberg", &defaults()),
  };
  config
    .with_total_volume(10000.0)
    .with_variance_percent(30.0)
    .with_child_bounds(100.0, 1500.0)
}

#[rstest]
#[case("vwap", 1)]
#[case("vwap", 99)]
#[case("twap", 7)]
#[case("twap", 1234)]
#[case("iceberg", 3)]
#[case("iceberg", 4242)]
fn test_executed_volume_monotonic_and_bounded(#[case] kind: &str, #[case] seed: u64) {
  let config = config_for(kind);
  let total = config.total_volume;
  let max_child = config.max_child_size;
  let mut scheduler = ExecutionScheduler::with_seed(config, seed).unwrap();
  scheduler.start(0);

  let mut previous = 0.0;
  for tick in 1..=1000 {
    let before = scheduler.stats().executed_volume;
    let emitted = scheduler.tick(tick * 1000).unwrap();

    let mut remaining = total - before;
    for slice in &emitted {
      assert!(slice.displayed_size > 0.0);
      assert!(slice.displayed_size <= max_child);
      assert!(slice.displayed_size <= remaining + 1e-9);
      remaining -= slice.displayed_size;
    }

    let executed = scheduler.stats().executed_volume;
    assert!(executed >= previous);
    assert!(executed <= total);
    previous = executed;

    if scheduler.state() == SchedulerState::Stopped {
      break;
    }
  }

  assert_eq!(scheduler.halt_reason(), Some(HaltReason::Completed));
  assert_eq!(scheduler.stats().executed_volume, total);
}

#[rstest]
#[case("vwap")]
#[case("twap")]
#[case("iceberg")]
fn test_no_orders_after_completion(#[case] kind: &str) {
  let mut scheduler = ExecutionScheduler::with_seed(config_for(kind), 11).unwrap();
  scheduler.start(0);

  let mut now = 0;
  while scheduler.state() == SchedulerState::Running {
    now += 1000;
    scheduler.tick(now).unwrap();
  }

  let completed = scheduler.stats().clone();
  for _ in 0..5 {
    now += 1000;
    assert!(scheduler.tick(now).unwrap().is_empty());
  }
  assert_eq!(scheduler.stats().orders_executed, completed.orders_executed);
  assert_eq!(scheduler.stats().executed_volume, completed.executed_volume);
}

#[test]
fn test_iceberg_first_tick_respects_display_window() {
  let config = StrategyConfig::iceberg("iceberg", &defaults()).with_total_volume(10000.0);
  let mut scheduler = ExecutionScheduler::with_seed(config, 8).unwrap();
  scheduler.start(0);

  scheduler.tick(1000).unwrap();

  assert!(scheduler.stats().active_slices <= 3);
  assert!(scheduler.stats().executed_volume <= 3000.0);
  assert!(scheduler.stats().executed_volume > 0.0);
}

#[rstest]
#[case(StrategyConfig::iceberg("iceberg", &defaults()))]
#[case(StrategyConfig::twap("twap", &defaults()).with_variance_percent(0.0))]
#[case(StrategyConfig::vwap("vwap", &defaults()).with_variance_percent(0.0))]
fn test_small_order_fills_in_single_tick(#[case] config: StrategyConfig) {
  let mut config = config.with_total_volume(500.0).with_child_bounds(100.0, 2000.0);
  if let xquant_exec::AlgoParams::Twap { num_slices } = &mut config.algo {
    *num_slices = 1;
  }
  if let xquant_exec::AlgoParams::Vwap { volume_profile } = &mut config.algo {
    *volume_profile = vec![1.0];
  }

  let mut scheduler = ExecutionScheduler::with_seed(config, 21).unwrap();
  scheduler.start(0);

  let emitted = scheduler.tick(1000).unwrap();

  assert_eq!(emitted.len(), 1);
  assert_eq!(emitted[0].displayed_size, 500.0);
  assert_eq!(scheduler.stats().orders_executed, 1);
  assert_eq!(scheduler.state(), SchedulerState::Stopped);
  assert_eq!(scheduler.halt_reason(), Some(HaltReason::Completed));
}

#[test]
fn test_stop_resets_and_pause_keeps_stats() {
  let mut scheduler = ExecutionScheduler::with_seed(config_for("iceberg"), 2).unwrap();
  scheduler.start(0);
  scheduler.tick(1000).unwrap();
  let before_pause = scheduler.stats().clone();

  assert!(scheduler.pause(1500));
  assert_eq!(scheduler.state(), SchedulerState::Paused);
  assert_eq!(scheduler.stats().executed_volume, before_pause.executed_volume);
  assert_eq!(scheduler.stats().orders_executed, before_pause.orders_executed);
  assert_eq!(scheduler.stats().active_slices, before_pause.active_slices);

  // 일시정지 중에는 틱이 무시됨
  assert!(scheduler.tick(2000).unwrap().is_empty());

  assert!(scheduler.stop());
  assert_eq!(scheduler.stats(), &ExecutionStats::default());
  assert_eq!(scheduler.state(), SchedulerState::Stopped);
  assert!(!scheduler.config().enabled);
}

#[test]
fn test_stop_clears_completed_stats() {
  let config = StrategyConfig::iceberg("iceberg", &defaults()).with_total_volume(500.0);
  let mut scheduler = ExecutionScheduler::with_seed(config, 2).unwrap();
  scheduler.start(0);
  scheduler.tick(1000).unwrap();
  assert_eq!(scheduler.stats().executed_volume, 500.0);

  assert!(!scheduler.stop());
  assert_eq!(scheduler.stats().executed_volume, 0.0);
  assert_eq!(scheduler.stats().orders_executed, 0);
}

#[test]
fn test_pause_then_start_resumes() {
  let mut scheduler = ExecutionScheduler::with_seed(config_for("twap"), 5).unwrap();
  assert!(scheduler.start(0));
  assert!(!scheduler.start(10));

  scheduler.tick(1000).unwrap();
  scheduler.tick(2000).unwrap();
  let executed = scheduler.stats().executed_volume;
  let orders = scheduler.stats().orders_executed;

  scheduler.pause(2500);
  assert!(!scheduler.pause(2600));
  assert!(scheduler.start(3000));

  assert_eq!(scheduler.state(), SchedulerState::Running);
  assert_eq!(scheduler.stats().executed_volume, executed);
  assert_eq!(scheduler.stats().orders_executed, orders);

  scheduler.tick(4000).unwrap();
  assert_eq!(scheduler.stats().orders_executed, orders + 1);
}

#[test]
fn test_controls_are_noops_when_stopped() {
  let mut scheduler = ExecutionScheduler::with_seed(config_for("vwap"), 5).unwrap();
  assert!(!scheduler.pause(0));
  assert!(!scheduler.stop());
  assert_eq!(scheduler.state(), SchedulerState::Stopped);
  assert_eq!(scheduler.halt_reason(), None);
}

#[test]
fn test_vwap_zero_weight_bucket_does_not_stall() {
  let mut config = StrategyConfig::vwap("vwap", &defaults())
    .with_total_volume(10000.0)
    .with_variance_percent(0.0)
    .with_child_bounds(100.0, 1000.0);
  if let xquant_exec::AlgoParams::Vwap { volume_profile } = &mut config.algo {
    *volume_profile = vec![1.0, 0.0];
  }

  let mut scheduler = ExecutionScheduler::with_seed(config, 3).unwrap();
  scheduler.start(0);

  for tick in 1..=50 {
    scheduler.tick(tick * 1000).unwrap();
    if scheduler.state() == SchedulerState::Stopped {
      break;
    }
  }

  assert_eq!(scheduler.halt_reason(), Some(HaltReason::Completed));
  assert_eq!(scheduler.stats().executed_volume, 10000.0);
  assert_eq!(scheduler.stats().orders_executed, 10);
}
