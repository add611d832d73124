//! 네이버 금융 크롤러.
//!
//! 시장 지수, 외국인/기관 수급, 주요 뉴스를 네이버 금융에서 수집합니다.
//!
//! ## 데이터 소스
//! - `/sise/`: KOSPI/KOSDAQ 지수, 투자자별 매매 동향
//! - `/`: USD/KRW 환율
//! - `/world/`: 미국 지수 (나스닥100, S&P500, 필라델피아 반도체)
//! - `/news/mainnews.naver`: 주요 뉴스 헤드라인
//!
//! ## 사용 예시
//! ```rust,ignore
//! let fetcher = NaverMarketFetcher::new();
//! let market = fetcher.fetch_market_indices().await?;
//! println!("KOSPI: {}", market.kospi.index);
//! ```

use reqwest::Client;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DataError, Result};

const BASE_URL: &str = "https://finance.naver.com";

/// 뉴스 헤드라인 최대 수집 개수.
const MAX_NEWS_ITEMS: usize = 5;

/// 지수 시세 (현재가 / 전일대비 / 등락률).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexQuote {
    /// 현재 지수
    pub index: String,
    /// 전일대비
    pub change: String,
    /// 등락률 (예: "-1.51%")
    pub change_rate: String,
}

/// 미국 지수.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsIndices {
    /// 나스닥 100
    pub nasdaq: String,
    /// S&P 500
    pub snp500: String,
    /// 필라델피아 반도체 지수
    pub sox: String,
}

/// 시장 지수 데이터.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarketData {
    pub kospi: IndexQuote,
    pub kosdaq: IndexQuote,
    /// USD/KRW 환율
    pub exchange_rate: String,
    pub us_indices: UsIndices,
}

/// 시장별 순매수 금액 (억원 단위, 부호 유지).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplyBreakdown {
    pub kospi: String,
    pub kosdaq: String,
}

/// 투자자별 수급 데이터.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupplyData {
    /// 외국인 순매수
    pub foreigner: SupplyBreakdown,
    /// 기관 순매수
    pub institution: SupplyBreakdown,
}

/// 뉴스 헤드라인.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsHeadline {
    /// 제목
    pub title: String,
    /// 기사 링크 (절대 URL)
    pub link: String,
    /// 언론사
    pub press: String,
    /// 게재 시간
    pub time: String,
}

/// 네이버 금융 크롤러.
///
/// HTML 파싱을 통해 네이버 금융에서 시장 데이터를 수집합니다.
#[derive(Clone)]
pub struct NaverMarketFetcher {
    client: Client,
    base_url: String,
}

impl Default for NaverMarketFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl NaverMarketFetcher {
    /// 기본 설정으로 생성 (30초 타임아웃).
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// 커스텀 타임아웃으로 생성.
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    /// 테스트용 base URL 오버라이드.
    #[doc(hidden)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 페이지 HTML 텍스트 다운로드.
    ///
    /// 네이버 금융은 EUC-KR로 서빙되지만 Content-Type 헤더에 charset이
    /// 선언되어 있어 `text()`가 올바르게 디코딩합니다.
    /// `scraper::Html`은 `Send`가 아니므로 파싱은 await 지점이 지난 뒤
    /// 동기 코드에서만 수행합니다.
    async fn fetch_page(&self, path: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataError::RateLimited);
        }
        if !status.is_success() {
            return Err(DataError::Api {
                status: status.as_u16().to_string(),
                message: format!("{} 요청 실패", path),
            });
        }

        Ok(response.text().await?)
    }

    /// 시장 지수 수집 (KOSPI, KOSDAQ, 환율, 미국 지수).
    pub async fn fetch_market_indices(&self) -> Result<MarketData> {
        let sise_html = self.fetch_page("/sise/").await?;
        let main_html = self.fetch_page("/").await?;
        let world_html = self.fetch_page("/world/").await?;

        parse_market_indices(&sise_html, &main_html, &world_html)
    }

    /// 투자자별 수급 수집 (외국인/기관 순매수).
    pub async fn fetch_supply(&self) -> Result<SupplyData> {
        let sise_html = self.fetch_page("/sise/").await?;
        Ok(extract_supply(&Html::parse_document(&sise_html)))
    }

    /// 주요 뉴스 헤드라인 수집 (상위 5건).
    pub async fn fetch_top_news(&self) -> Result<Vec<NewsHeadline>> {
        let news_html = self.fetch_page("/news/mainnews.naver").await?;
        Ok(extract_news(
            &Html::parse_document(&news_html),
            &self.base_url,
        ))
    }
}

/// 세 페이지의 HTML에서 시장 지수 데이터를 조립.
fn parse_market_indices(sise_html: &str, main_html: &str, world_html: &str) -> Result<MarketData> {
    let sise = Html::parse_document(sise_html);
    let kospi = extract_index_quote(&sise, "KOSPI")
        .ok_or_else(|| DataError::Parse("KOSPI 지수를 찾을 수 없습니다".to_string()))?;
    let kosdaq = extract_index_quote(&sise, "KOSDAQ")
        .ok_or_else(|| DataError::Parse("KOSDAQ 지수를 찾을 수 없습니다".to_string()))?;

    let main = Html::parse_document(main_html);
    let exchange_rate = extract_exchange_rate(&main).unwrap_or_default();

    let world = Html::parse_document(world_html);
    let us_indices = UsIndices {
        nasdaq: extract_global_index(&world, "NAS@NDX").unwrap_or_else(|| "0.00".to_string()),
        snp500: extract_global_index(&world, "SPI@SPX").unwrap_or_else(|| "0.00".to_string()),
        sox: extract_global_index(&world, "NAS@SOX").unwrap_or_else(|| "0.00".to_string()),
    };

    Ok(MarketData {
        kospi,
        kosdaq,
        exchange_rate,
        us_indices,
    })
}

/// `#<prefix>_now` / `#<prefix>_change` 엘리먼트에서 지수 시세 추출.
///
/// change 엘리먼트의 텍스트는 "60.32 -1.51% 하락" 형식입니다.
fn extract_index_quote(document: &Html, prefix: &str) -> Option<IndexQuote> {
    let now_selector = Selector::parse(&format!("#{}_now", prefix)).ok()?;
    let change_selector = Selector::parse(&format!("#{}_change", prefix)).ok()?;

    let index = document
        .select(&now_selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();

    let change_raw = document
        .select(&change_selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();
    let mut parts = change_raw.split_whitespace();
    let change = parts.next().unwrap_or_default().to_string();
    let change_rate = parts.next().unwrap_or_default().to_string();

    Some(IndexQuote {
        index,
        change,
        change_rate,
    })
}

/// 메인 페이지에서 USD/KRW 환율 추출.
fn extract_exchange_rate(document: &Html) -> Option<String> {
    let selector =
        Selector::parse(".article2 .section1 .group1 table tbody tr:first-child td:nth-of-type(1)")
            .ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 세계 지수 페이지에서 심볼에 해당하는 지수 값 추출.
///
/// 심볼 링크(`a[href*="NAS@NDX"]`)가 포함된 행의 `.tb_td3` 셀이 지수입니다.
fn extract_global_index(document: &Html, symbol: &str) -> Option<String> {
    let row_selector = Selector::parse("tr").ok()?;
    let link_selector = Selector::parse(&format!(r#"a[href*="{}"]"#, symbol)).ok()?;
    let value_selector = Selector::parse(".tb_td3").ok()?;

    for row in document.select(&row_selector) {
        if row.select(&link_selector).next().is_some() {
            let value = row
                .select(&value_selector)
                .next()?
                .text()
                .collect::<String>()
                .trim()
                .to_string();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// 투자자별 매매 동향 추출.
///
/// `tab_sel1`은 KOSPI, `tab_sel2`는 KOSDAQ 탭이며 `.c3`이 외국인,
/// `.c4`가 기관 컬럼입니다. "억" 접미사는 제거하고 부호는 유지합니다.
fn extract_supply(document: &Html) -> SupplyData {
    let get = |selector_str: &str| -> String {
        Selector::parse(selector_str)
            .ok()
            .and_then(|selector| {
                document
                    .select(&selector)
                    .next()
                    .map(|el| el.text().collect::<String>().trim().replace('억', ""))
            })
            .unwrap_or_default()
    };

    SupplyData {
        foreigner: SupplyBreakdown {
            kospi: get("#tab_sel1_deal_trend .c3 .val"),
            kosdaq: get("#tab_sel2_deal_trend .c3 .val"),
        },
        institution: SupplyBreakdown {
            kospi: get("#tab_sel1_deal_trend .c4 .val"),
            kosdaq: get("#tab_sel2_deal_trend .c4 .val"),
        },
    }
}

/// 주요 뉴스 목록 추출 (상위 5건).
///
/// 상대 링크는 절대 URL로 변환하고, 언론사가 없으면 "네이버금융"으로
/// 대체합니다.
fn extract_news(document: &Html, base_url: &str) -> Vec<NewsHeadline> {
    let item_selector = match Selector::parse(".mainNewsList li, .newsList li") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let title_selector = Selector::parse("dd.articleSubject a, dt.articleSubject a").ok();
    let press_selector = Selector::parse("dd.articleSummary .press, dt.articleSummary .press").ok();
    let time_selector = Selector::parse("dd.articleSummary .wdate, dt.articleSummary .wdate").ok();

    let (Some(title_selector), Some(press_selector), Some(time_selector)) =
        (title_selector, press_selector, time_selector)
    else {
        return Vec::new();
    };

    let mut items = Vec::new();

    for element in document.select(&item_selector) {
        let Some(title_el) = element.select(&title_selector).next() else {
            continue;
        };

        let title = title_el.text().collect::<String>().trim().to_string();
        let mut link = title_el.value().attr("href").unwrap_or_default().to_string();
        if !link.is_empty() && !link.starts_with("http") {
            link = format!("{}{}", base_url, link);
        }

        let press = element
            .select(&press_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "네이버금융".to_string());

        let time = element
            .select(&time_selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        items.push(NewsHeadline {
            title,
            link,
            press,
            time,
        });

        if items.len() >= MAX_NEWS_ITEMS {
            break;
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const SISE_FIXTURE: &str = r#"
        <html><body>
          <span id="KOSPI_now">2,501.53</span>
          <span id="KOSPI_change">60.32 -1.51% 하락</span>
          <span id="KOSDAQ_now">690.78</span>
          <span id="KOSDAQ_change">8.11 +1.19% 상승</span>
          <div id="tab_sel1_deal_trend">
            <table><tr>
              <td class="c3"><span class="val">+15,685억</span></td>
              <td class="c4"><span class="val">-3,210억</span></td>
            </tr></table>
          </div>
          <div id="tab_sel2_deal_trend">
            <table><tr>
              <td class="c3"><span class="val">-820억</span></td>
              <td class="c4"><span class="val">+120억</span></td>
            </tr></table>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_index_quote() {
        let document = Html::parse_document(SISE_FIXTURE);

        let kospi = extract_index_quote(&document, "KOSPI").unwrap();
        assert_eq!(kospi.index, "2,501.53");
        assert_eq!(kospi.change, "60.32");
        assert_eq!(kospi.change_rate, "-1.51%");

        let kosdaq = extract_index_quote(&document, "KOSDAQ").unwrap();
        assert_eq!(kosdaq.index, "690.78");
        assert_eq!(kosdaq.change_rate, "+1.19%");
    }

    #[test]
    fn test_extract_index_quote_missing() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(extract_index_quote(&document, "KOSPI").is_none());
    }

    #[test]
    fn test_extract_supply_strips_unit() {
        let document = Html::parse_document(SISE_FIXTURE);
        let supply = extract_supply(&document);

        assert_eq!(supply.foreigner.kospi, "+15,685");
        assert_eq!(supply.foreigner.kosdaq, "-820");
        assert_eq!(supply.institution.kospi, "-3,210");
        assert_eq!(supply.institution.kosdaq, "+120");
    }

    #[test]
    fn test_extract_global_index() {
        let html = r#"
            <table>
              <tr>
                <td><a href="/world/sise.naver?symbol=NAS@NDX">나스닥 100</a></td>
                <td class="tb_td3">21,491.31</td>
              </tr>
              <tr>
                <td><a href="/world/sise.naver?symbol=SPI@SPX">S&amp;P 500</a></td>
                <td class="tb_td3">6,501.86</td>
              </tr>
            </table>
        "#;
        let document = Html::parse_document(html);

        assert_eq!(
            extract_global_index(&document, "NAS@NDX"),
            Some("21,491.31".to_string())
        );
        assert_eq!(
            extract_global_index(&document, "SPI@SPX"),
            Some("6,501.86".to_string())
        );
        assert_eq!(extract_global_index(&document, "NAS@SOX"), None);
    }

    #[test]
    fn test_extract_news() {
        let html = r#"
            <ul class="mainNewsList">
              <li>
                <dl>
                  <dd class="articleSubject"><a href="/news/news_read.naver?article_id=1">반도체 수출 급증</a></dd>
                  <dd class="articleSummary">
                    <span class="press">연합뉴스</span>
                    <span class="wdate">2026-08-30 09:12</span>
                  </dd>
                </dl>
              </li>
              <li>
                <dl>
                  <dd class="articleSubject"><a href="https://n.news.naver.com/article/2">환율 1,400원 돌파</a></dd>
                  <dd class="articleSummary"><span class="wdate">2026-08-30 08:55</span></dd>
                </dl>
              </li>
            </ul>
        "#;
        let document = Html::parse_document(html);
        let news = extract_news(&document, "https://finance.naver.com");

        assert_eq!(news.len(), 2);
        assert_eq!(news[0].title, "반도체 수출 급증");
        assert_eq!(
            news[0].link,
            "https://finance.naver.com/news/news_read.naver?article_id=1"
        );
        assert_eq!(news[0].press, "연합뉴스");
        // 절대 URL은 그대로, 언론사 누락 시 기본값
        assert_eq!(news[1].link, "https://n.news.naver.com/article/2");
        assert_eq!(news[1].press, "네이버금융");
    }

    #[test]
    fn test_extract_news_caps_at_five() {
        let item = r#"
            <li><dl>
              <dd class="articleSubject"><a href="/a">t</a></dd>
              <dd class="articleSummary"><span class="press">p</span><span class="wdate">w</span></dd>
            </dl></li>
        "#;
        let html = format!(r#"<ul class="mainNewsList">{}</ul>"#, item.repeat(8));
        let document = Html::parse_document(&html);

        assert_eq!(extract_news(&document, "https://finance.naver.com").len(), 5);
    }

    #[tokio::test]
    async fn test_fetch_market_indices_from_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let sise = server
            .mock("GET", "/sise/")
            .with_body(SISE_FIXTURE)
            .create_async()
            .await;
        let main = server
            .mock("GET", "/")
            .with_body("<html><body></body></html>")
            .create_async()
            .await;
        let world = server
            .mock("GET", "/world/")
            .with_body("<html><body></body></html>")
            .create_async()
            .await;

        let fetcher = NaverMarketFetcher::new().with_base_url(server.url());
        let market = fetcher.fetch_market_indices().await.unwrap();

        assert_eq!(market.kospi.index, "2,501.53");
        assert_eq!(market.us_indices.nasdaq, "0.00");
        sise.assert_async().await;
        main.assert_async().await;
        world.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_supply_server_error_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        let sise = server
            .mock("GET", "/sise/")
            .with_status(500)
            .create_async()
            .await;

        let fetcher = NaverMarketFetcher::new().with_base_url(server.url());
        let result = fetcher.fetch_supply().await;

        assert!(matches!(
            result,
            Err(DataError::Api { ref status, .. }) if status == "500"
        ));
        sise.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_supply_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/sise/")
            .with_status(429)
            .create_async()
            .await;

        let fetcher = NaverMarketFetcher::new().with_base_url(server.url());
        let result = fetcher.fetch_supply().await;

        assert!(matches!(result, Err(DataError::RateLimited)));
    }
}
