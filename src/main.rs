/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;

use xquant_exec::api::routes;
use xquant_exec::config::Config;
use xquant_exec::core::{ExecutionScheduler, StrategyManager};
use xquant_exec::models::execution_stats::SchedulerState;
use xquant_exec::models::strategy_config::StrategyConfig;
use xquant_exec::utils::{self, logging};

/// 시뮬레이션 모드에서 전략별 최대 틱 수
const SIMULATION_TICK_LIMIT: usize = 10_000;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging)?;
    log::info!("주문 실행 스케줄러 시작...");

    // 명령줄 인수 확인
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "simulate" {
        run_simulation(&config)?;
    } else {
        run_server(config).await?;
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<(), anyhow::Error> {
    // 전략 관리자 생성
    let mut manager = StrategyManager::new(config.scheduler.clone());
    if config.seed_demo_strategies {
        let seeded = manager.seed_demo_strategies()?;
        log::info!("데모 전략 {}개 등록", seeded.len());
    }
    let manager = Arc::new(RwLock::new(manager));

    // API 라우트 초기화
    let routes = routes::create_routes(manager.clone());
    log::info!("API 라우트 초기화 완료");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    log::info!("서버 시작: http://{}/", addr);

    let (_, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        let _ = tokio::signal::ctrl_c().await;
    });
    server.await;

    log::info!("서버 종료, 전략 태스크 정리 중...");
    manager.write().await.dispose().await?;

    Ok(())
}

/// 데모 전략을 타이머 없이 완료까지 실행하고 결과 출력
fn run_simulation(config: &Config) -> Result<(), anyhow::Error> {
    log::info!("시뮬레이션 모드 시작...");

    let demos = vec![
        StrategyConfig::vwap("VWAP Demo", &config.scheduler),
        StrategyConfig::twap("TWAP Demo", &config.scheduler),
        StrategyConfig::iceberg("Iceberg Demo", &config.scheduler),
    ];

    println!("\n=== 실행 결과 ===");
    for demo in demos {
        let mut scheduler = ExecutionScheduler::new(demo)?;
        let started_at = utils::current_timestamp_ms();
        let mut now = started_at;
        scheduler.start(now);

        for _ in 0..SIMULATION_TICK_LIMIT {
            if scheduler.state() != SchedulerState::Running {
                break;
            }
            now += scheduler.next_interval().as_millis() as i64;
            scheduler.tick(now)?;
        }

        let snapshot = scheduler.snapshot();
        println!(
            "{} [{}]: {:.2} / {:.2} ({:.1}%) - 주문 {}건 - 종료 사유: {:?} - 완료 시각: {}",
            snapshot.config.name,
            snapshot.config.algo.kind(),
            snapshot.stats.executed_volume,
            snapshot.config.total_volume,
            snapshot.progress_percent,
            snapshot.stats.orders_executed,
            snapshot.halt_reason,
            utils::format_timestamp(now, "%Y-%m-%d %H:%M:%S"),
        );
    }

    Ok(())
}
