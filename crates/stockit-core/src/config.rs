//! 환경변수 기반 설정 관리.

use std::time::Duration;

use crate::error::{InsightError, InsightResult};

/// 애플리케이션 설정.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인사이트 파이프라인 설정
    pub insight: InsightConfig,
}

/// 서버 설정.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// Swagger UI 노출 여부
    pub swagger_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            swagger_enabled: true,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 연결 URL
    pub url: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connection_timeout_secs: u64,
}

/// 인사이트 파이프라인 설정.
///
/// API 키는 선택 사항입니다. DART 키가 없으면 공시 수집은 빈 결과로
/// 처리되고, Gemini 키가 없으면 분석 엔드포인트가 비활성 상태를
/// 보고합니다.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// OpenDART API 키
    pub dart_api_key: Option<String>,
    /// Gemini API 키
    pub gemini_api_key: Option<String>,
    /// 개별 fetcher 타임아웃 (초)
    pub fetch_timeout_secs: u64,
    /// 분석 호출 타임아웃 (초)
    pub analyze_timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            dart_api_key: None,
            gemini_api_key: None,
            fetch_timeout_secs: 20,
            analyze_timeout_secs: 60,
        }
    }
}

impl InsightConfig {
    /// 개별 fetcher 타임아웃을 Duration으로 반환.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// 분석 호출 타임아웃을 Duration으로 반환.
    pub fn analyze_timeout(&self) -> Duration {
        Duration::from_secs(self.analyze_timeout_secs)
    }
}

impl AppConfig {
    /// 환경변수에서 설정 로드.
    pub fn from_env() -> InsightResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL").map_err(|_| {
            InsightError::Config("DATABASE_URL 환경변수가 설정되지 않았습니다".to_string())
        })?;

        Ok(Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env_var_parse("SERVER_PORT", 3000),
                swagger_enabled: env_var_bool("SWAGGER_UI_ENABLED", true),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: env_var_parse("DATABASE_MAX_CONNECTIONS", 10),
                connection_timeout_secs: env_var_parse("DATABASE_CONNECT_TIMEOUT_SECS", 30),
            },
            insight: InsightConfig::from_env(),
        })
    }
}

impl InsightConfig {
    /// 환경변수에서 인사이트 설정 로드 (모두 선택 사항).
    pub fn from_env() -> Self {
        Self {
            dart_api_key: env_var_nonempty("OPENDART_API_KEY"),
            gemini_api_key: env_var_nonempty("GEMINI_API_KEY"),
            fetch_timeout_secs: env_var_parse("INSIGHT_FETCH_TIMEOUT_SECS", 20),
            analyze_timeout_secs: env_var_parse("INSIGHT_ANALYZE_TIMEOUT_SECS", 60),
        }
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용).
pub fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 환경변수에서 bool 값 파싱.
pub fn env_var_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

/// 비어 있지 않은 환경변수만 Some으로 반환.
///
/// 빈 문자열 키는 미설정과 동일하게 취급합니다 (DART 공시 수집의
/// 빈 결과 정책과 일치).
pub fn env_var_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_parse_default() {
        assert_eq!(env_var_parse("STOCKIT_TEST_MISSING_PORT", 3000u16), 3000);
    }

    #[test]
    fn test_env_var_bool_accepts_true_and_one() {
        std::env::set_var("STOCKIT_TEST_BOOL_KEY", "1");
        assert!(env_var_bool("STOCKIT_TEST_BOOL_KEY", false));
        std::env::set_var("STOCKIT_TEST_BOOL_KEY", "false");
        assert!(!env_var_bool("STOCKIT_TEST_BOOL_KEY", true));
        std::env::remove_var("STOCKIT_TEST_BOOL_KEY");

        assert!(env_var_bool("STOCKIT_TEST_BOOL_MISSING", true));
    }

    #[test]
    fn test_env_var_nonempty_filters_blank() {
        std::env::set_var("STOCKIT_TEST_BLANK_KEY", "   ");
        assert_eq!(env_var_nonempty("STOCKIT_TEST_BLANK_KEY"), None);
        std::env::set_var("STOCKIT_TEST_BLANK_KEY", "abc");
        assert_eq!(
            env_var_nonempty("STOCKIT_TEST_BLANK_KEY"),
            Some("abc".to_string())
        );
        std::env::remove_var("STOCKIT_TEST_BLANK_KEY");
    }

    #[test]
    fn test_insight_config_durations() {
        let config = InsightConfig {
            fetch_timeout_secs: 5,
            analyze_timeout_secs: 15,
            ..Default::default()
        };
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.analyze_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_insight_config_default_has_usable_timeouts() {
        let config = InsightConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(20));
        assert_eq!(config.analyze_timeout(), Duration::from_secs(60));
        assert!(config.dart_api_key.is_none());
        assert!(config.gemini_api_key.is_none());
    }
}
