//! 파이프라인 오케스트레이션: 수집 / 분석 / 리포트 생성.
//!
//! # 부분 실패 정책
//!
//! 수집은 네 개의 독립 소스를 병렬로 호출하며, 개별 소스 실패는
//! 치명적이지 않습니다. 실패한 소스는 빈 값으로 대체되어 팩트 시트의
//! 해당 섹션이 비어 있게 됩니다. 팩트 시트 저장 실패만이 수집 실패입니다.
//!
//! 뉴스 레코드 저장은 best-effort입니다: 실패해도 수집은 성공으로
//! 처리되며 결과 통계에 에러가 기록됩니다.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::time::{error::Elapsed, timeout};
use tracing::{info, warn};
use uuid::Uuid;

use stockit_core::{InsightConfig, InsightError, InsightResult};
use stockit_data::{
    generate_fact_sheet, seoul_now, DartApiClient, NaverMarketFetcher, StructuredData,
};

use crate::analyzer::MarketAnalyzer;
use crate::personas::find_persona;
use crate::repository::{
    FactSheetInput, FactSheetRecord, FactSheetRepository, NewsItemInput, NewsRepository,
    ReportInput, ReportRepository, ResearchReportRecord, SnapshotInput, SnapshotRepository,
};

/// 수집에 사용되는 데이터 소스 묶음.
#[derive(Clone)]
pub struct CollectSources {
    pub naver: NaverMarketFetcher,
    pub dart: DartApiClient,
}

/// 수집 작업 통계.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectStats {
    /// 지수 수집 성공 여부
    pub market_ok: bool,
    /// 수급 수집 성공 여부
    pub supply_ok: bool,
    /// 뉴스 수집 성공 여부
    pub news_ok: bool,
    /// DART 공시 수집 성공 여부
    pub dart_ok: bool,
    /// 수집된 뉴스 헤드라인 수
    pub news_count: usize,
    /// 수집된 공시 수
    pub notices_count: usize,
    /// 저장된 뉴스 레코드 수. 저장 실패 시 `None`.
    pub news_persisted: Option<usize>,
    /// 뉴스 저장 실패 사유.
    pub news_error: Option<String>,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectStats {
    /// 성공한 소스 수 (0~4).
    pub fn sources_ok(&self) -> usize {
        [self.market_ok, self.supply_ok, self.news_ok, self.dart_ok]
            .iter()
            .filter(|ok| **ok)
            .count()
    }

    /// 통계 요약 로그 출력.
    pub fn log_summary(&self) {
        info!(
            sources_ok = self.sources_ok(),
            market_ok = self.market_ok,
            supply_ok = self.supply_ok,
            news_ok = self.news_ok,
            dart_ok = self.dart_ok,
            news_count = self.news_count,
            notices_count = self.notices_count,
            news_persisted = ?self.news_persisted,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}

/// 수집 결과.
#[derive(Debug, Clone)]
pub struct CollectOutcome {
    pub fact_sheet_id: Uuid,
    pub stats: CollectStats,
}

fn db_err(e: sqlx::Error) -> InsightError {
    InsightError::Database(e.to_string())
}

/// 타임아웃/소스 에러를 기본값으로 정산합니다.
///
/// 반환값의 두 번째 요소는 소스 성공 여부입니다.
fn settle<T: Default>(
    source: &str,
    outcome: Result<stockit_data::Result<T>, Elapsed>,
) -> (T, bool) {
    match outcome {
        Ok(Ok(value)) => (value, true),
        Ok(Err(e)) => {
            let err = InsightError::source(source, e);
            warn!(error = %err, "소스 수집 실패, 빈 값으로 대체");
            (T::default(), false)
        }
        Err(_) => {
            let err = InsightError::source(source, "타임아웃");
            warn!(error = %err, "소스 수집 타임아웃, 빈 값으로 대체");
            (T::default(), false)
        }
    }
}

/// 수집 사이클 1회 실행.
///
/// 네 소스를 병렬 수집하고 팩트 시트를 생성해 저장합니다.
/// 뉴스 헤드라인도 팩트 시트에 연결해 저장합니다 (best-effort).
pub async fn collect_once(
    pool: &PgPool,
    sources: &CollectSources,
    config: &InsightConfig,
) -> InsightResult<CollectOutcome> {
    let started = Instant::now();
    let fetch_timeout = config.fetch_timeout();

    let (market, supply, news, notices) = tokio::join!(
        timeout(fetch_timeout, sources.naver.fetch_market_indices()),
        timeout(fetch_timeout, sources.naver.fetch_supply()),
        timeout(fetch_timeout, sources.naver.fetch_top_news()),
        timeout(fetch_timeout, sources.dart.fetch_recent_notices()),
    );

    let (market, market_ok) = settle("naver_indices", market);
    let (supply, supply_ok) = settle("naver_supply", supply);
    let (news, news_ok) = settle("naver_news", news);
    let (notices, dart_ok) = settle("dart_notices", notices);

    let mut stats = CollectStats {
        market_ok,
        supply_ok,
        news_ok,
        dart_ok,
        news_count: news.len(),
        notices_count: notices.len(),
        ..CollectStats::default()
    };

    let raw_content = generate_fact_sheet(&market, &supply, &news, &notices, seoul_now());
    let structured = StructuredData { market, supply };
    let structured_data = serde_json::to_value(&structured)?;

    let sheet = FactSheetRepository::create(
        pool,
        FactSheetInput {
            raw_content,
            structured_data: Some(structured_data),
        },
    )
    .await
    .map_err(db_err)?;

    let items: Vec<NewsItemInput> = news
        .into_iter()
        .map(|n| NewsItemInput {
            title: n.title,
            link: n.link,
            press: n.press,
            time: n.time,
        })
        .collect();

    match NewsRepository::insert_many(pool, sheet.id, &items).await {
        Ok(count) => stats.news_persisted = Some(count),
        Err(e) => {
            warn!(error = %e, "뉴스 레코드 저장 실패 (수집은 계속)");
            stats.news_error = Some(e.to_string());
        }
    }

    stats.elapsed = started.elapsed();
    stats.log_summary();

    Ok(CollectOutcome {
        fact_sheet_id: sheet.id,
        stats,
    })
}

async fn latest_fact_sheet(pool: &PgPool) -> InsightResult<FactSheetRecord> {
    FactSheetRepository::find_latest(pool)
        .await
        .map_err(db_err)?
        .ok_or_else(|| InsightError::NotFound("팩트 시트가 없습니다. 먼저 수집을 실행하세요".to_string()))
}

/// 분석 사이클 1회 실행.
///
/// 최신 팩트 시트를 전처리 → 분석하고 스냅샷으로 저장한 뒤
/// 스냅샷 ID를 반환합니다.
pub async fn analyze_once(
    pool: &PgPool,
    analyzer: &MarketAnalyzer,
    config: &InsightConfig,
) -> InsightResult<Uuid> {
    let sheet = latest_fact_sheet(pool).await?;

    let structured: Option<StructuredData> = sheet
        .structured_data
        .as_ref()
        .and_then(|v| serde_json::from_value(v.clone()).ok());

    let condensed = analyzer.preprocess(&sheet.raw_content).await;

    let result = timeout(
        config.analyze_timeout(),
        analyzer.analyze(&condensed, structured.as_ref()),
    )
    .await
    .map_err(|_| InsightError::Timeout("시장 분석 시간 초과".to_string()))??;

    let payload = serde_json::to_value(&result)?;
    let snapshot = SnapshotRepository::create(
        pool,
        SnapshotInput {
            mode_type: result.mode_type,
            payload,
            fact_sheet_id: Some(sheet.id),
        },
    )
    .await
    .map_err(db_err)?;

    info!(snapshot_id = %snapshot.id, fact_sheet_id = %sheet.id, "분석 스냅샷 저장");
    Ok(snapshot.id)
}

/// 페르소나 리서치 리포트 생성.
///
/// 최신 팩트 시트를 기반으로 인트로(제목/요약)와 본문을 생성해
/// 저장합니다.
pub async fn generate_report(
    pool: &PgPool,
    analyzer: &MarketAnalyzer,
    persona_id: &str,
) -> InsightResult<ResearchReportRecord> {
    let persona = find_persona(persona_id)
        .ok_or_else(|| InsightError::InvalidInput(format!("알 수 없는 페르소나: {}", persona_id)))?;

    let sheet = latest_fact_sheet(pool).await?;

    let intro = analyzer.report_intro(persona, &sheet.raw_content).await?;
    let body = analyzer.report_body(persona, &sheet.raw_content).await?;

    let report = ReportRepository::create(
        pool,
        ReportInput {
            persona_id: persona.id.to_string(),
            persona_name: persona.name.to_string(),
            title: intro.title,
            summary: intro.summary,
            content: body,
            fact_sheet_id: Some(sheet.id),
        },
    )
    .await
    .map_err(db_err)?;

    info!(report_id = %report.id, persona = persona.id, "리서치 리포트 저장");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockit_data::{DataError, MarketData};

    #[test]
    fn test_stats_sources_ok_counts() {
        let stats = CollectStats {
            market_ok: true,
            supply_ok: false,
            news_ok: true,
            dart_ok: true,
            ..CollectStats::default()
        };
        assert_eq!(stats.sources_ok(), 3);
    }

    #[tokio::test]
    async fn test_settle_success_passes_value() {
        let mut market = MarketData::default();
        market.kospi.index = "2500".to_string();
        let (value, ok) = settle("naver_indices", Ok(Ok(market.clone())));
        assert!(ok);
        assert_eq!(value, market);
    }

    #[tokio::test]
    async fn test_settle_source_error_yields_default() {
        let outcome: Result<stockit_data::Result<MarketData>, Elapsed> =
            Ok(Err(DataError::Parse("KOSPI 지수를 찾을 수 없음".to_string())));
        let (value, ok) = settle("naver_indices", outcome);
        assert!(!ok);
        assert_eq!(value, MarketData::default());
    }

    #[tokio::test]
    async fn test_settle_timeout_yields_default() {
        let elapsed = timeout(Duration::ZERO, std::future::pending::<()>())
            .await
            .unwrap_err();
        let outcome: Result<stockit_data::Result<MarketData>, Elapsed> = Err(elapsed);
        let (value, ok) = settle("naver_indices", outcome);
        assert!(!ok);
        assert_eq!(value, MarketData::default());
    }
}
