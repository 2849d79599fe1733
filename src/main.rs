//! # StudyHive 웹 서버 진입점
//!
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 저장소 선택 (`DATABASE_URL`이 있으면 SQLite, 없으면 메모리)
//! 4. 라우터 조립 후 HTTP 서버 시작
//! 5. Ctrl+C / SIGTERM을 받으면 진행 중인 요청을 마치고 종료

use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use studyhive::{
    config::Config, db::Store, routes::AppState, services::password::PasswordService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 studyhive, tower_http, axum 모듈을 debug 레벨로
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studyhive=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("JWT_SECRET must be set")?;
    tracing::info!("Starting StudyHive server on {}", config.bind_addr());

    let store = match &config.database_url {
        Some(url) => {
            tracing::info!("Using SQLite store: {}", url);
            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await?;
            Store::sqlite(pool).await?
        }
        None => {
            tracing::warn!("DATABASE_URL not set, data is kept in memory only");
            Store::in_memory()
        }
    };

    let passwords = PasswordService::new(config.argon2_memory_kib, config.argon2_iterations)?;

    let state = AppState {
        store,
        jwt_secret: config.jwt_secret.clone(),
        passwords,
        port: config.port,
    };

    let app = studyhive::router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
