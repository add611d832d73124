//! Stockit 인사이트 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다. 수집/분석/조회/리포트
//! 엔드포인트와 헬스 체크, Swagger UI를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use stockit_api::openapi::swagger_ui_router;
use stockit_api::routes::create_api_router;
use stockit_api::state::AppState;
use stockit_core::{init_logging_from_env, AppConfig};

/// 데이터베이스 연결 풀 생성.
///
/// 연결 실패는 치명적이지 않습니다. 파이프라인 엔드포인트만 503을
/// 반환하고 서버는 기동합니다.
async fn create_db_pool(config: &AppConfig) -> Option<PgPool> {
    match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => {
            if sqlx::query("SELECT 1").execute(&pool).await.is_ok() {
                info!("데이터베이스 연결됨");
                Some(pool)
            } else {
                error!("데이터베이스 연결 확인 실패");
                None
            }
        }
        Err(e) => {
            error!(error = %e, "데이터베이스 연결 실패");
            None
        }
    }
}

fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS에 유효한 origin이 없어 전체 허용");
                AllowOrigin::any()
            } else {
                info!(count = origins.len(), "CORS origin 설정됨");
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS 미설정, 전체 origin 허용 (개발 모드)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "종료 시그널 핸들러 등록 실패");
    }
    info!("종료 시그널 수신, graceful shutdown 시작");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_logging_from_env()?;

    info!("Stockit API 서버 시작");

    let config = AppConfig::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let db_pool = create_db_pool(&config).await;
    let state = Arc::new(AppState::new(&config, db_pool));

    info!(
        version = %state.version,
        has_db = state.db_pool.is_some(),
        has_analyzer = state.analyzer.is_some(),
        has_dart_key = state.insight.dart_api_key.is_some(),
        "애플리케이션 상태 초기화됨"
    );

    let mut app = create_api_router();
    if config.server.swagger_enabled {
        app = app.merge(swagger_ui_router());
        info!(
            "Swagger UI: http://{}:{}/swagger-ui",
            config.server.host, config.server.port
        );
    }
    let app = app
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(90),
        ))
        .with_state(state);

    info!(%addr, "API 서버 리스닝");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("서버 종료됨");
    Ok(())
}
