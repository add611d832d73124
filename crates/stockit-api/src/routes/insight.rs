//! 인사이트 파이프라인 endpoint.
//!
//! - `GET /api/v1/insight/collect` - 수집 사이클 실행
//! - `GET /api/v1/insight/analyze` - 분석 사이클 실행
//! - `GET /api/v1/insight/latest` - 최신 스냅샷 조회 (빈 상태는 에러가 아님)
//! - `GET /api/v1/insight/fact-sheet` - 최신 팩트 시트 원문 (진단용)
//! - `GET /api/v1/insight/report` - 리서치 리포트 목록
//! - `POST /api/v1/insight/report/generate` - 페르소나 리포트 생성

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use stockit_insight::repository::ResearchReportRecord;
use stockit_insight::{
    analyze_once, collect_once, find_persona, generate_report, latest_fact_sheet_text,
    latest_insight, list_reports, InsightView, MarketAnalyzer,
};

use crate::error::{map_insight_error, ApiErrorResponse};
use crate::state::AppState;

type ApiError = (StatusCode, Json<ApiErrorResponse>);

/// 수집 결과 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CollectResponse {
    pub success: bool,
    pub fact_sheet_id: Uuid,
    /// 성공한 데이터 소스 수 (0~4)
    pub sources_ok: usize,
    pub news_count: usize,
    pub notices_count: usize,
    /// 저장된 뉴스 레코드 수. 저장 실패 시 `null`.
    pub news_persisted: Option<usize>,
}

/// 분석 결과 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub snapshot_id: Uuid,
}

/// 스냅샷 DTO.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SnapshotDto {
    pub id: Uuid,
    pub mode_type: String,
    /// 위젯 레이아웃과 콘텐츠 (`layout`, `widgets`, `raw_data`)
    #[schema(value_type = Object)]
    pub payload: Value,
    pub fact_sheet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<InsightView> for SnapshotDto {
    fn from(view: InsightView) -> Self {
        Self {
            id: view.id,
            mode_type: view.mode_type,
            payload: view.payload,
            fact_sheet_id: view.fact_sheet_id,
            created_at: view.created_at,
        }
    }
}

/// 최신 인사이트 응답. 스냅샷이 없어도 200입니다.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LatestResponse {
    pub data: Option<SnapshotDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// 최신 팩트 시트 응답 (진단용).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FactSheetResponse {
    /// 최신 팩트 시트 원문. 없으면 `null`.
    pub data: Option<String>,
}

/// 리서치 리포트 DTO.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportDto {
    pub id: Uuid,
    pub persona_id: String,
    pub persona_name: String,
    pub title: String,
    pub summary: String,
    /// 마크다운 본문
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<ResearchReportRecord> for ReportDto {
    fn from(record: ResearchReportRecord) -> Self {
        Self {
            id: record.id,
            persona_id: record.persona_id,
            persona_name: record.persona_name,
            title: record.title,
            summary: record.summary,
            content: record.content,
            created_at: record.created_at,
        }
    }
}

/// 리포트 목록 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<ReportDto>,
}

/// 리포트 목록 쿼리.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// 특정 페르소나의 최신 1건만 조회
    pub persona_id: Option<String>,
}

/// 리포트 생성 요청.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateReportRequest {
    pub persona_id: String,
}

fn require_pool(state: &AppState) -> Result<&PgPool, ApiError> {
    state.db_pool.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiErrorResponse::new(
                "DB_NOT_CONFIGURED",
                "데이터베이스가 설정되지 않았습니다",
            )),
        )
    })
}

fn require_analyzer(state: &AppState) -> Result<&MarketAnalyzer, ApiError> {
    state.analyzer.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiErrorResponse::new(
                "ANALYZER_NOT_CONFIGURED",
                "GEMINI_API_KEY가 설정되지 않았습니다",
            )),
        )
    })
}

/// 수집 사이클 실행.
#[utoipa::path(
    get,
    path = "/api/v1/insight/collect",
    tag = "insight",
    responses(
        (status = 200, description = "수집 완료 (부분 실패 포함)", body = CollectResponse),
        (status = 500, description = "팩트 시트 저장 실패", body = ApiErrorResponse),
        (status = 503, description = "데이터베이스 미설정", body = ApiErrorResponse)
    )
)]
pub async fn collect(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CollectResponse>, ApiError> {
    let pool = require_pool(&state)?;

    let outcome = collect_once(pool, &state.sources, &state.insight)
        .await
        .map_err(|e| map_insight_error(&e))?;

    Ok(Json(CollectResponse {
        success: true,
        fact_sheet_id: outcome.fact_sheet_id,
        sources_ok: outcome.stats.sources_ok(),
        news_count: outcome.stats.news_count,
        notices_count: outcome.stats.notices_count,
        news_persisted: outcome.stats.news_persisted,
    }))
}

/// 분석 사이클 실행.
#[utoipa::path(
    get,
    path = "/api/v1/insight/analyze",
    tag = "insight",
    responses(
        (status = 200, description = "분석 완료", body = AnalyzeResponse),
        (status = 404, description = "분석할 팩트 시트 없음", body = ApiErrorResponse),
        (status = 503, description = "데이터베이스/분석기 미설정", body = ApiErrorResponse)
    )
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let pool = require_pool(&state)?;
    let analyzer = require_analyzer(&state)?;

    let snapshot_id = analyze_once(pool, analyzer, &state.insight)
        .await
        .map_err(|e| map_insight_error(&e))?;

    Ok(Json(AnalyzeResponse {
        success: true,
        snapshot_id,
    }))
}

/// 최신 인사이트 스냅샷 조회.
///
/// 스냅샷이 없으면 `data: null`과 안내 메시지로 200을 반환합니다.
#[utoipa::path(
    get,
    path = "/api/v1/insight/latest",
    tag = "insight",
    responses(
        (status = 200, description = "최신 스냅샷 (없으면 data: null)", body = LatestResponse),
        (status = 503, description = "데이터베이스 미설정", body = ApiErrorResponse)
    )
)]
pub async fn latest(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LatestResponse>, ApiError> {
    let pool = require_pool(&state)?;

    let view = latest_insight(pool)
        .await
        .map_err(|e| map_insight_error(&e))?;

    Ok(Json(latest_response(view)))
}

/// 조회 결과를 응답으로 변환합니다. 빈 저장소는 `data: null` + 안내
/// 메시지이며 에러가 아닙니다.
fn latest_response(view: Option<InsightView>) -> LatestResponse {
    match view {
        Some(view) => LatestResponse {
            data: Some(view.into()),
            message: None,
        },
        None => LatestResponse {
            data: None,
            message: Some("아직 생성된 인사이트가 없습니다".to_string()),
        },
    }
}

/// 최신 팩트 시트 원문 조회 (진단용).
#[utoipa::path(
    get,
    path = "/api/v1/insight/fact-sheet",
    tag = "insight",
    responses(
        (status = 200, description = "최신 팩트 시트 원문 (없으면 data: null)", body = FactSheetResponse),
        (status = 503, description = "데이터베이스 미설정", body = ApiErrorResponse)
    )
)]
pub async fn fact_sheet(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FactSheetResponse>, ApiError> {
    let pool = require_pool(&state)?;

    let data = latest_fact_sheet_text(pool)
        .await
        .map_err(|e| map_insight_error(&e))?;

    Ok(Json(FactSheetResponse { data }))
}

/// 리서치 리포트 목록.
///
/// `persona_id`가 있으면 해당 페르소나 최신 1건, 없으면 최신 10건.
#[utoipa::path(
    get,
    path = "/api/v1/insight/report",
    tag = "insight",
    params(("persona_id" = Option<String>, Query, description = "페르소나 ID")),
    responses(
        (status = 200, description = "리포트 목록", body = ReportListResponse),
        (status = 503, description = "데이터베이스 미설정", body = ApiErrorResponse)
    )
)]
pub async fn reports(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let pool = require_pool(&state)?;

    let reports = list_reports(pool, query.persona_id.as_deref())
        .await
        .map_err(|e| map_insight_error(&e))?;

    Ok(Json(ReportListResponse {
        reports: reports.into_iter().map(ReportDto::from).collect(),
    }))
}

/// 페르소나 리서치 리포트 생성.
#[utoipa::path(
    post,
    path = "/api/v1/insight/report/generate",
    tag = "insight",
    request_body = GenerateReportRequest,
    responses(
        (status = 200, description = "생성된 리포트", body = ReportDto),
        (status = 400, description = "알 수 없는 페르소나", body = ApiErrorResponse),
        (status = 404, description = "팩트 시트 없음", body = ApiErrorResponse),
        (status = 503, description = "데이터베이스/분석기 미설정", body = ApiErrorResponse)
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GenerateReportRequest>,
) -> Result<Json<ReportDto>, ApiError> {
    // 페르소나 검증이 가장 저렴하므로 먼저 수행
    if find_persona(&request.persona_id).is_none() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiErrorResponse::new(
                "INVALID_INPUT",
                format!("알 수 없는 페르소나: {}", request.persona_id),
            )),
        ));
    }

    let pool = require_pool(&state)?;
    let analyzer = require_analyzer(&state)?;

    let report = generate_report(pool, analyzer, &request.persona_id)
        .await
        .map_err(|e| map_insight_error(&e))?;

    Ok(Json(report.into()))
}

/// 인사이트 라우터 생성.
pub fn insight_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/collect", get(collect))
        .route("/analyze", get(analyze))
        .route("/latest", get(latest))
        .route("/fact-sheet", get(fact_sheet))
        .route("/report", get(reports))
        .route("/report/generate", post(generate))
}
