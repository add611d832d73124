//! 데이터 수집 에러 타입.

use thiserror::Error;

/// 데이터 소스 에러.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("HTTP 요청 실패: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTML 파싱 실패: {0}")]
    Parse(String),

    #[error("API 에러 ({status}): {message}")]
    Api { status: String, message: String },

    #[error("Rate limit 초과")]
    RateLimited,
}

/// 데이터 수집 Result 타입 별칭.
pub type Result<T> = std::result::Result<T, DataError>;
