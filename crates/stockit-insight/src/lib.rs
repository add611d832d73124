//! 인사이트 파이프라인.
//!
//! 수집 → 집계 → 분석 → 조회의 단방향 데이터 흐름을 구현합니다:
//!
//! ```text
//! Fetchers → generate_fact_sheet → market_fact_sheets (불변)
//!          → MarketAnalyzer(Gemini) → insight_snapshots (불변)
//!          → reader::latest_insight → API 응답 (NewsBrief 주입)
//! ```
//!
//! 모든 저장 레코드는 append-only이며 "최신"은 항상 `created_at`
//! 내림차순으로 결정됩니다.

pub mod analyzer;
pub mod gemini;
pub mod personas;
pub mod pipeline;
pub mod prompts;
pub mod reader;
pub mod repository;

pub use analyzer::{AnalysisResult, MarketAnalyzer, ReportIntro};
pub use gemini::{GeminiClient, GenerationConfig, MODEL_FLASH, MODEL_PRO};
pub use personas::{find_persona, Persona, PERSONAS};
pub use pipeline::{
    analyze_once, collect_once, generate_report, CollectOutcome, CollectSources, CollectStats,
};
pub use reader::{
    inject_news, latest_fact_sheet_text, latest_insight, list_reports, InsightView, NewsBriefItem,
};
