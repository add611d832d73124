//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/v1/insight` - 인사이트 파이프라인 (수집/분석/조회/리포트)

pub mod health;
pub mod insight;

pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use insight::{
    insight_router, AnalyzeResponse, CollectResponse, FactSheetResponse, GenerateReportRequest,
    LatestResponse, ReportDto, ReportListResponse, SnapshotDto,
};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/v1/insight", insight_router())
}
