//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::fs::OpenOptions;

use crate::config::LoggingConfig;
use crate::error::TradingError;
use crate::models::child_order::ChildOrder;
use crate::models::execution_stats::{ExecutionStats, HaltReason};

/// 로깅 시스템 초기화
///
/// RUST_LOG 가 없으면 설정 파일의 레벨을 사용한다.
/// file_path 가 있으면 해당 파일에 이어서 기록한다.
pub fn init(config: &LoggingConfig) -> Result<(), TradingError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    builder
      .filter_level(parse_level(&log_level))
      .format_timestamp_millis()
      .target(log_target(config.file_path.as_deref())?)
      .try_init()
      .map_err(|e| TradingError::ConfigError(format!("Failed to initialise logger: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);
    if let Some(path) = &config.file_path {
        log::info!("로그 파일: {}", path);
    }

    Ok(())
}

/// 로그 출력 대상 결정
pub fn log_target(file_path: Option<&str>) -> Result<Target, TradingError> {
    match file_path.filter(|path| !path.is_empty()) {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(Target::Pipe(Box::new(file)))
        }
        None => Ok(Target::Stderr),
    }
}

/// 로그 레벨 파싱
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

/// 전략 시작 로그
pub fn log_strategy_start(strategy_name: &str, strategy_id: &str, total_volume: f64) {
    log::info!("전략 시작: {} ({}) - 목표 수량: {}", strategy_name, strategy_id, total_volume);
}

/// 전략 일시정지 로그
pub fn log_strategy_paused(strategy_name: &str, stats: &ExecutionStats) {
    log::info!("전략 일시정지: {} - 실행 수량: {} - 주문 수: {}",
               strategy_name, stats.executed_volume, stats.orders_executed);
}

/// 전략 정지 로그
pub fn log_strategy_halt(strategy_name: &str, reason: HaltReason, stats: &ExecutionStats) {
    log::info!("전략 종료: {} - 사유: {:?} - 실행 수량: {} - 주문 수: {}",
               strategy_name, reason, stats.executed_volume, stats.orders_executed);
}

/// 슬라이스 생성 로그
pub fn log_slice_emitted(slice: &ChildOrder, stats: &ExecutionStats) {
    log::debug!("슬라이스 생성: {} #{} - 노출: {} - 숨김: {:?} - 누적: {}",
                slice.strategy_id, slice.sequence, slice.displayed_size, slice.hidden_size,
                stats.executed_volume);
}

/// 오류 로그
pub fn log_error(context: &str, error: &TradingError) {
    log::error!("오류 발생 - {}: {}", context, error);
}
