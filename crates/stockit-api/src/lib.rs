//! Stockit REST API 서버 라이브러리.
//!
//! 인사이트 파이프라인(수집/분석/조회/리포트) 엔드포인트와 헬스 체크,
//! OpenAPI 문서를 제공합니다.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

pub use error::ApiErrorResponse;
pub use state::AppState;
