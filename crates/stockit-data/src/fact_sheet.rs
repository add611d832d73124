//! 팩트 시트 생성.
//!
//! 네 소스의 수집 결과를 하나의 텍스트 팩트 시트로 병합하는 순수
//! 변환입니다. 시각은 인자로 받으므로 동일 입력은 항상 동일 출력을
//! 생성합니다. 저장은 호출자(수집 오케스트레이터)의 책임입니다.

use chrono::{DateTime, Utc};
use chrono_tz::Asia::Seoul;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dart::DartNotice;
use crate::naver::{MarketData, NewsHeadline, SupplyData};

/// 팩트 시트와 함께 저장되는 구조화 프로젝션.
///
/// 프론트엔드 위젯이 정밀한 원본 수치를 쓸 수 있도록 내러티브 텍스트와
/// 별도로 보존합니다.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructuredData {
    pub market: MarketData,
    pub supply: SupplyData,
}

/// 현재 시각을 서울 타임존으로 반환.
pub fn seoul_now() -> DateTime<Tz> {
    Utc::now().with_timezone(&Seoul)
}

/// 팩트 시트 텍스트 생성.
///
/// 섹션 구성: 시장 현황 → 수급 동향 → 글로벌 컨텍스트 → 주요 뉴스 →
/// 최근 공시. 실패한 소스의 빈 입력은 빈 섹션으로 남습니다.
pub fn generate_fact_sheet(
    market: &MarketData,
    supply: &SupplyData,
    news: &[NewsHeadline],
    notices: &[DartNotice],
    now: DateTime<Tz>,
) -> String {
    let news_lines = news
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{}. {}", i + 1, n.title))
        .collect::<Vec<_>>()
        .join("\n");

    let notice_lines = notices
        .iter()
        .enumerate()
        .map(|(i, n)| format!("{}. [{}] {} ({})", i + 1, n.corp_name, n.report_nm, n.rcept_dt))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "[Market Status]\n\
         Time: {now}\n\
         KOSPI: {kospi} ({kospi_change} / {kospi_rate})\n\
         KOSDAQ: {kosdaq} ({kosdaq_change} / {kosdaq_rate})\n\
         USD/KRW: {fx}\n\
         \n\
         [Supply Trend]\n\
         Foreigner: KOSPI {f_kospi}, KOSDAQ {f_kosdaq}\n\
         Institution: KOSPI {i_kospi}, KOSDAQ {i_kosdaq}\n\
         \n\
         [Global Context]\n\
         Nasdaq: {nasdaq}\n\
         S&P500: {snp}\n\
         SOX: {sox}\n\
         \n\
         [Major News]\n\
         {news_lines}\n\
         \n\
         [Recent Disclosures (DART)]\n\
         {notice_lines}",
        now = now.format("%Y-%m-%d %H:%M:%S %Z"),
        kospi = market.kospi.index,
        kospi_change = market.kospi.change,
        kospi_rate = market.kospi.change_rate,
        kosdaq = market.kosdaq.index,
        kosdaq_change = market.kosdaq.change,
        kosdaq_rate = market.kosdaq.change_rate,
        fx = market.exchange_rate,
        f_kospi = supply.foreigner.kospi,
        f_kosdaq = supply.foreigner.kosdaq,
        i_kospi = supply.institution.kospi,
        i_kosdaq = supply.institution.kosdaq,
        nasdaq = market.us_indices.nasdaq,
        snp = market.us_indices.snp500,
        sox = market.us_indices.sox,
    )
    .trim()
    .to_string()
}
