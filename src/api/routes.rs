use std::sync::Arc;
use tokio::sync::RwLock;
use warp::Filter;

use crate::api::handlers;
use crate::core::strategy_manager::StrategyManager;

/// 전략 제어 API 라우트 생성
pub fn create_routes(
    strategy_manager: Arc<RwLock<StrategyManager>>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // 헬스체크 라우트
    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    // 상태 필터 생성
    let manager_filter = warp::any().map(move || strategy_manager.clone());

    // 전략 관리 라우트
    let strategies = warp::path("strategies");

    let collection_routes = strategies
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(manager_filter.clone())
        .and_then(handlers::create_strategy)
        .or(strategies
            .and(warp::path::end())
            .and(warp::get())
            .and(manager_filter.clone())
            .and_then(handlers::list_strategies));

    let item_routes = strategies
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(manager_filter.clone())
        .and_then(handlers::get_strategy)
        .or(strategies
            .and(warp::path::param::<String>())
            .and(warp::path::end())
            .and(warp::put())
            .and(warp::body::json())
            .and(manager_filter.clone())
            .and_then(handlers::update_strategy))
        .or(strategies
            .and(warp::path::param::<String>())
            .and(warp::path::end())
            .and(warp::delete())
            .and(manager_filter.clone())
            .and_then(handlers::delete_strategy));

    // 시작/일시정지/정지 라우트
    let control_routes = strategies
        .and(warp::path::param::<String>())
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::post())
        .and(manager_filter.clone())
        .and_then(handlers::control_strategy);

    // 모든 라우트 결합
    health
        .or(collection_routes)
        .or(item_routes)
        .or(control_routes)
}
