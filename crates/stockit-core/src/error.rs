//! 인사이트 파이프라인의 에러 타입.
//!
//! 수집 → 집계 → 분석 → 조회 단계별 실패를 구분합니다.
//! 뉴스 저장 실패는 에러가 아니라 `CollectStats`에 기록되는 결과이므로
//! 여기에 variant가 없습니다.

use thiserror::Error;

/// 인사이트 파이프라인 에러.
#[derive(Debug, Error)]
pub enum InsightError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 소스 에러 (네이버 금융, DART 등 개별 fetcher 실패)
    #[error("데이터 소스 에러 ({source_name}): {message}")]
    Source {
        source_name: String,
        message: String,
    },

    /// 찾을 수 없음 (팩트 시트 없이 분석 요청 등)
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 데이터베이스 에러 (팩트 시트/스냅샷 저장 실패는 치명적)
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 분석 서비스 에러 (Gemini 호출/응답 파싱 실패)
    #[error("분석 에러: {0}")]
    Analysis(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),

    /// 타임아웃
    #[error("타임아웃: {0}")]
    Timeout(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 인사이트 작업을 위한 Result 타입.
pub type InsightResult<T> = Result<T, InsightError>;

impl InsightError {
    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 소스 실패와 타임아웃은 다음 수집 사이클에서 회복될 수 있습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Source { .. } | Self::Timeout(_) | Self::Database(_)
        )
    }

    /// fetcher 실패를 소스 에러로 변환하는 헬퍼.
    pub fn source(source: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Source {
            source_name: source.into(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for InsightError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_helper() {
        let err = InsightError::source("naver", "connection refused");
        assert!(matches!(err, InsightError::Source { .. }));
        assert!(err.to_string().contains("naver"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(InsightError::source("dart", "500").is_retryable());
        assert!(InsightError::Timeout("fetch".into()).is_retryable());
        assert!(!InsightError::NotFound("fact sheet".into()).is_retryable());
        assert!(!InsightError::InvalidInput("persona".into()).is_retryable());
    }
}
