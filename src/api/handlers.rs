// 전략 제어 핸들러들

use std::sync::Arc;
use serde::Deserialize;
use tokio::sync::RwLock;
use warp::http::StatusCode;
use warp::reply::{json, with_status, Reply};

use crate::core::strategy_manager::StrategyManager;
use crate::error::TradingError;
use crate::models::strategy_config::StrategyConfig;

/// 전략 생성/변경 요청 모델
#[derive(Debug, Deserialize)]
pub struct StrategyFormRequest {
  pub kind: String,
  pub name: Option<String>,
  #[serde(default)]
  pub params: serde_json::Value,
}

/// 오류 종류별 HTTP 상태 코드
fn error_status(error: &TradingError) -> StatusCode {
  match error {
    TradingError::StrategyNotFound(_) => StatusCode::NOT_FOUND,
    TradingError::DuplicateStrategy(_) | TradingError::StrategyRunning(_) => StatusCode::CONFLICT,
    TradingError::InvalidParameter(_) | TradingError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
    _ => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

fn error_reply(context: &str, error: TradingError) -> warp::reply::WithStatus<warp::reply::Json> {
  let error_response = serde_json::json!({
    "error": format!("{}: {}", context, error),
  });
  with_status(json(&error_response), error_status(&error))
}

/// 헬스체크 핸들러
pub async fn health_handler() -> Result<impl Reply, warp::Rejection> {
  Ok(with_status(json(&serde_json::json!({"status": "ok"})), StatusCode::OK))
}

/// 전략 목록 조회 핸들러
pub async fn list_strategies(
  strategy_manager: Arc<RwLock<StrategyManager>>,
) -> Result<impl Reply, warp::Rejection> {
  let manager = strategy_manager.read().await;
  let strategies = manager.list();

  Ok(with_status(json(&strategies), StatusCode::OK))
}

/// 전략 생성 핸들러
pub async fn create_strategy(
  req: StrategyFormRequest,
  strategy_manager: Arc<RwLock<StrategyManager>>,
) -> Result<impl Reply, warp::Rejection> {
  let mut manager = strategy_manager.write().await;

  let config = match StrategyConfig::from_form(&req.kind, req.name.as_deref(), &req.params, manager.defaults()) {
    Ok(config) => config,
    Err(e) => return Ok(error_reply("Failed to create strategy", e)),
  };

  match manager.add_strategy(config) {
    Ok(snapshot) => Ok(with_status(json(&snapshot), StatusCode::CREATED)),
    Err(e) => Ok(error_reply("Failed to add strategy", e)),
  }
}

/// 전략 상태 조회 핸들러
pub async fn get_strategy(
  id: String,
  strategy_manager: Arc<RwLock<StrategyManager>>,
) -> Result<impl Reply, warp::Rejection> {
  let manager = strategy_manager.read().await;
  match manager.snapshot(&id) {
    Ok(snapshot) => Ok(with_status(json(&snapshot), StatusCode::OK)),
    Err(e) => Ok(error_reply("Failed to get strategy status", e)),
  }
}

/// 전략 설정 변경 핸들러 (정지 상태에서만)
pub async fn update_strategy(
  id: String,
  req: StrategyFormRequest,
  strategy_manager: Arc<RwLock<StrategyManager>>,
) -> Result<impl Reply, warp::Rejection> {
  let manager = strategy_manager.read().await;

  let config = match StrategyConfig::from_form(&req.kind, req.name.as_deref(), &req.params, manager.defaults()) {
    Ok(config) => config.with_id(id.clone()),
    Err(e) => return Ok(error_reply("Failed to update strategy", e)),
  };

  match manager.update_config(&id, config).await {
    Ok(snapshot) => Ok(with_status(json(&snapshot), StatusCode::OK)),
    Err(e) => Ok(error_reply("Failed to update strategy", e)),
  }
}

/// 전략 삭제 핸들러
pub async fn delete_strategy(
  id: String,
  strategy_manager: Arc<RwLock<StrategyManager>>,
) -> Result<impl Reply, warp::Rejection> {
  let mut manager = strategy_manager.write().await;
  match manager.remove_strategy(&id).await {
    Ok(_) => {
      let response = serde_json::json!({
        "status": "success",
        "message": "Strategy deleted successfully",
        "strategy_id": id
      });

      Ok(with_status(json(&response), StatusCode::OK))
    },
    Err(e) => Ok(error_reply("Failed to delete strategy", e)),
  }
}

/// 시작/일시정지/정지 핸들러
pub async fn control_strategy(
  id: String,
  action: String,
  strategy_manager: Arc<RwLock<StrategyManager>>,
) -> Result<impl Reply, warp::Rejection> {
  let manager = strategy_manager.read().await;

  let result = match action.as_str() {
    "start" => manager.start(&id).await,
    "pause" => manager.pause(&id).await,
    "stop" => manager.stop(&id).await,
    other => Err(TradingError::InvalidParameter(format!("Unknown action: {}", other))),
  };

  match result {
    Ok(snapshot) => Ok(with_status(json(&snapshot), StatusCode::OK)),
    Err(e) => Ok(error_reply(&format!("Failed to {} strategy", action), e)),
  }
}
