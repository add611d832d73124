//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! Arc로 래핑되어 Axum의 State extractor를 통해 핸들러에 주입됩니다.

use std::time::Instant;

use sqlx::PgPool;

use stockit_core::{AppConfig, InsightConfig};
use stockit_data::{DartApiClient, NaverMarketFetcher};
use stockit_insight::{CollectSources, GeminiClient, MarketAnalyzer};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 풀. 없으면 파이프라인 엔드포인트는 503.
    pub db_pool: Option<PgPool>,

    /// 인사이트 파이프라인 설정 (타임아웃, API 키 유무)
    pub insight: InsightConfig,

    /// 수집 데이터 소스 (네이버 금융 + DART)
    pub sources: CollectSources,

    /// 시장 분석기. Gemini API 키가 없으면 `None`.
    pub analyzer: Option<MarketAnalyzer>,

    /// API 버전
    pub version: String,

    /// 서버 시작 시각
    pub started_at: Instant,
}

impl AppState {
    /// 설정으로부터 상태 구성.
    pub fn new(config: &AppConfig, db_pool: Option<PgPool>) -> Self {
        let insight = config.insight.clone();

        let sources = CollectSources {
            naver: NaverMarketFetcher::with_timeout(insight.fetch_timeout()),
            dart: DartApiClient::new(insight.dart_api_key.clone()),
        };

        let analyzer = insight
            .gemini_api_key
            .as_deref()
            .map(|key| MarketAnalyzer::new(GeminiClient::new(key)));

        Self {
            db_pool,
            insight,
            sources,
            analyzer,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Instant::now(),
        }
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// 데이터베이스 연결 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").execute(pool).await.is_ok(),
            None => false,
        }
    }
}

/// 테스트용 상태 (DB/분석기 없음).
pub fn create_test_state() -> AppState {
    let insight = InsightConfig::default();
    AppState {
        db_pool: None,
        sources: CollectSources {
            naver: NaverMarketFetcher::new(),
            dart: DartApiClient::new(None),
        },
        analyzer: None,
        insight,
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: Instant::now(),
    }
}
