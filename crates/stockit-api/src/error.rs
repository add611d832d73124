//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use stockit_core::InsightError;

/// 통합 API 에러 응답.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "팩트 시트가 없습니다",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "DB_ERROR", "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 추가 에러 상세 정보 (선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<Value>,
    /// 에러 발생 타임스탬프 (Unix timestamp, 선택적)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

/// 파이프라인 에러를 HTTP 응답으로 변환.
pub fn map_insight_error(e: &InsightError) -> (StatusCode, Json<ApiErrorResponse>) {
    let (status, code) = match e {
        InsightError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        InsightError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
        InsightError::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "NOT_CONFIGURED"),
        InsightError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DB_ERROR"),
        InsightError::Analysis(_) => (StatusCode::BAD_GATEWAY, "ANALYSIS_FAILED"),
        InsightError::Timeout(_) => (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT"),
        InsightError::Source { .. } => (StatusCode::BAD_GATEWAY, "SOURCE_UNAVAILABLE"),
        InsightError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION"),
    };
    (status, Json(ApiErrorResponse::new(code, e.to_string())))
}
