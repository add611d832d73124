//! Standalone insight pipeline CLI.

use clap::{Parser, Subcommand};
use sqlx::PgPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockit_collector::CollectorConfig;
use stockit_core::{InsightError, InsightResult};
use stockit_data::{DartApiClient, NaverMarketFetcher};
use stockit_insight::{
    analyze_once, collect_once, generate_report, CollectSources, GeminiClient, MarketAnalyzer,
};

#[derive(Parser)]
#[command(name = "stockit-collector")]
#[command(about = "Stockit Insight Pipeline Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 시장 데이터 수집 → 팩트 시트 생성
    Collect,

    /// 최신 팩트 시트 분석 → 스냅샷 저장
    Analyze,

    /// 페르소나 리서치 리포트 생성
    Report {
        /// 페르소나 ID (graham, buffett, lynch, wood, soros, livermore, dreman)
        #[arg(long)]
        persona: String,
    },

    /// 전체 워크플로우 실행 (수집 → 분석)
    RunAll,

    /// 데몬 모드: 주기적으로 전체 워크플로우 실행
    Daemon,
}

fn build_sources(config: &CollectorConfig) -> CollectSources {
    CollectSources {
        naver: NaverMarketFetcher::with_timeout(config.insight.fetch_timeout()),
        dart: DartApiClient::new(config.insight.dart_api_key.clone()),
    }
}

fn build_analyzer(config: &CollectorConfig) -> InsightResult<MarketAnalyzer> {
    let key = config.insight.gemini_api_key.as_deref().ok_or_else(|| {
        InsightError::Config("GEMINI_API_KEY 환경변수가 설정되지 않았습니다".to_string())
    })?;
    Ok(MarketAnalyzer::new(GeminiClient::new(key)))
}

/// 수집 → 분석 워크플로우 1회 실행.
async fn run_workflow(
    pool: &PgPool,
    config: &CollectorConfig,
    sources: &CollectSources,
    analyzer: &MarketAnalyzer,
) -> InsightResult<()> {
    tracing::info!("Step 1/2: 시장 데이터 수집");
    let outcome = collect_once(pool, sources, &config.insight).await?;
    tracing::info!(fact_sheet_id = %outcome.fact_sheet_id, "팩트 시트 저장됨");

    tracing::info!("Step 2/2: 시장 분석");
    let snapshot_id = analyze_once(pool, analyzer, &config.insight).await?;
    tracing::info!(snapshot_id = %snapshot_id, "스냅샷 저장됨");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("stockit_collector={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Stockit Insight Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;

    // DB 연결
    let pool = PgPool::connect(&config.database_url).await?;
    tracing::info!("데이터베이스 연결 성공");

    let sources = build_sources(&config);

    // 명령 실행
    match cli.command {
        Commands::Collect => {
            let outcome = collect_once(&pool, &sources, &config.insight).await?;
            tracing::info!(fact_sheet_id = %outcome.fact_sheet_id, "수집 완료");
        }
        Commands::Analyze => {
            let analyzer = build_analyzer(&config)?;
            let snapshot_id = analyze_once(&pool, &analyzer, &config.insight).await?;
            tracing::info!(snapshot_id = %snapshot_id, "분석 완료");
        }
        Commands::Report { persona } => {
            let analyzer = build_analyzer(&config)?;
            let report = generate_report(&pool, &analyzer, &persona).await?;
            tracing::info!(
                report_id = %report.id,
                persona = %report.persona_id,
                title = %report.title,
                "리포트 생성 완료"
            );
        }
        Commands::RunAll => {
            let analyzer = build_analyzer(&config)?;
            tracing::info!("=== 전체 워크플로우 시작 ===");
            run_workflow(&pool, &config, &sources, &analyzer).await?;
            tracing::info!("=== 전체 워크플로우 완료 ===");
        }
        Commands::Daemon => {
            let analyzer = build_analyzer(&config)?;
            tracing::info!(
                "=== 데몬 모드 시작 (주기: {}분) ===",
                config.daemon.interval_minutes
            );

            let mut interval = tokio::time::interval(config.daemon.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        tracing::info!("=== 워크플로우 실행 시작 ===");

                        // 사이클 실패는 데몬을 멈추지 않음
                        if let Err(e) = run_workflow(&pool, &config, &sources, &analyzer).await {
                            tracing::error!(error = %e, retryable = e.is_retryable(), "워크플로우 실패");
                        }

                        tracing::info!(
                            "=== 워크플로우 완료, 다음 실행: {}분 후 ===",
                            config.daemon.interval_minutes
                        );
                    }
                }
            }
        }
    }

    pool.close().await;
    tracing::info!("Stockit Insight Collector 종료");

    Ok(())
}
