//! 시장 데이터 수집 레이어.
//!
//! 인사이트 파이프라인에 공급되는 네 개의 독립 데이터 소스를 제공합니다:
//! - `NaverMarketFetcher`: 네이버 금융 크롤러 (지수, 수급, 뉴스)
//! - `DartApiClient`: OpenDART 최근 공시 API 클라이언트
//!
//! 각 fetcher는 서로 독립적으로 실패하며, 수집 오케스트레이터가
//! 부분 실패 정책을 결정합니다. 팩트 시트 생성(`generate_fact_sheet`)은
//! 순수 변환이며 이 크레이트의 유일한 비-IO 구성 요소입니다.

pub mod dart;
pub mod error;
pub mod fact_sheet;
pub mod naver;

pub use dart::{DartApiClient, DartNotice};
pub use error::{DataError, Result};
pub use fact_sheet::{generate_fact_sheet, seoul_now, StructuredData};
pub use naver::{
    IndexQuote, MarketData, NaverMarketFetcher, NewsHeadline, SupplyBreakdown, SupplyData,
    UsIndices,
};
