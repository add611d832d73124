//! 인사이트 스냅샷 payload의 위젯 이름 및 모드 타입 상수.
//!
//! payload 형식:
//!
//! ```json
//! {
//!   "mode_type": "active",
//!   "layout": ["HeroHeader", "NewsBrief", ...],
//!   "widgets": { "NewsBrief": { "items": [...] }, ... }
//! }
//! ```
//!
//! 위젯 데이터는 위젯별 자유 형식이므로 서버는 이름만 알면 됩니다.
//! 레이아웃 구성은 분석 모델이 결정하지만 NewsBrief는 항상 포함됩니다.

/// 기본 모드 타입. 분석 결과가 mode_type을 생략하면 이 값이 사용됩니다.
pub const DEFAULT_MODE_TYPE: &str = "active";

/// 히어로 헤더 (시장 요약 타이틀)
pub const HERO_HEADER: &str = "HeroHeader";
/// 공포/탐욕 게이지
pub const MARKET_GAUGE: &str = "MarketGauge";
/// 지수 티커 스트립
pub const MARKET_TICKER: &str = "MarketTicker";
/// 주도주 캐러셀
pub const STOCK_CAROUSEL: &str = "StockCarousel";
/// 섹터 히트맵
pub const SECTOR_HEATMAP: &str = "SectorHeatmap";
/// 외국인/기관 수급 동향
pub const SUPPLY_TREND: &str = "SupplyTrend";
/// 주요 뉴스 브리핑. Reader가 실제 뉴스 레코드를 주입하는 슬롯.
pub const NEWS_BRIEF: &str = "NewsBrief";
/// DART 공시 시그널
pub const DART_SIGNAL: &str = "DartSignal";
/// 시장 내러티브 (원인 분석)
pub const MARKET_NARRATIVE: &str = "MarketNarrative";
/// 애널리스트 노트
pub const ANALYST_NOTE: &str = "AnalystNote";
/// 투자 대가 리스트
pub const GURU_LIST: &str = "GuruList";
/// 테마 랭킹
pub const THEME_RANKING: &str = "ThemeRanking";
