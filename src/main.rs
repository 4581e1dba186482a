// region:    --- Imports
use auction_market::app::{build_router, AppState};
use auction_market::config::AppConfig;
use auction_market::database::DatabaseManager;
use auction_market::scheduler::SessionSweeper;
use auction_market::store::PostgresMarketStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일이 없어도 무시
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    // logging 초기화 (RUST_LOG 우선, 없으면 LOG_LEVEL)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = match DatabaseManager::new(&config.database).await {
        Ok(db_manager) => Arc::new(db_manager),
        Err(e) => {
            error!("{:<12} --> 데이터베이스 연결 실패: {:?}", "Main", e);
            return Err(e.into());
        }
    };

    // 데이터베이스 초기화
    if config.database.initialize_schema {
        if let Err(e) = db_manager.initialize_database().await {
            error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
            return Err(e.into());
        }
        info!("{:<12} --> 데이터베이스 초기화 성공", "Main");
    }

    let store = Arc::new(PostgresMarketStore::new(Arc::clone(&db_manager)));

    // 만료 세션 정리
    let sweeper = SessionSweeper::new(
        store.clone(),
        Duration::from_secs(config.session.sweep_interval_seconds),
    );
    sweeper.start();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let routes_all = build_router(AppState::new(store, config));

    // 리스너 생성
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
