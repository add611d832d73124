//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.

use axum::Router;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ApiErrorResponse;
use crate::routes::{
    AnalyzeResponse, CollectResponse, ComponentHealth, ComponentStatus, FactSheetResponse,
    GenerateReportRequest, HealthResponse, LatestResponse, ReportDto, ReportListResponse,
    SnapshotDto,
};
use crate::state::AppState;

/// Stockit API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockit Insight API",
        version = "0.1.0",
        description = r#"
# Stockit 시장 인사이트 REST API

한국 시장(KOSPI/KOSDAQ) 데이터를 수집하고 AI 분석 스냅샷을 제공합니다.

## 주요 기능

- **수집**: 네이버 금융 지수/수급/뉴스 + OpenDART 공시 → 팩트 시트
- **분석**: Gemini 2단계 분석 (Flash 전처리 → Pro 레이아웃 생성)
- **조회**: 최신 스냅샷 (NewsBrief에 실제 뉴스 주입)
- **리포트**: 투자 거장 페르소나 리서치 리포트
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::insight::collect,
        crate::routes::insight::analyze,
        crate::routes::insight::latest,
        crate::routes::insight::fact_sheet,
        crate::routes::insight::reports,
        crate::routes::insight::generate,
    ),
    components(schemas(
        ApiErrorResponse,
        HealthResponse,
        ComponentHealth,
        ComponentStatus,
        CollectResponse,
        AnalyzeResponse,
        LatestResponse,
        SnapshotDto,
        FactSheetResponse,
        ReportDto,
        ReportListResponse,
        GenerateReportRequest,
    )),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "insight", description = "인사이트 파이프라인")
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router() -> Router<Arc<AppState>> {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
