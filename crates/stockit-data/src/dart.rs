//! OpenDART 공시 API 클라이언트.
//!
//! 금융감독원 OpenDART `list.json` API에서 최근 공시 목록을 수집합니다.
//!
//! # API 키 정책
//!
//! DART 연동은 선택 사항입니다. API 키가 없으면 공시 수집은 빈 결과를
//! 반환하며, 파이프라인의 나머지 소스는 영향을 받지 않습니다.
//!
//! # 응답 status 코드
//!
//! - `000`: 정상 (list 포함)
//! - `013`: 조회 데이터 없음 (빈 결과로 처리)
//! - 그 외: 경고 로그 후 빈 결과

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::error::Result;

const BASE_URL: &str = "https://opendart.fss.or.kr";

/// 공시 최대 수집 개수.
const MAX_NOTICES: usize = 10;

/// 조회 범위 (영업일이 없는 주말/공휴일 대비 최근 N일).
const LOOKBACK_DAYS: i64 = 3;

/// DART 공시 레코드.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DartNotice {
    /// 접수번호
    pub rcept_no: String,
    /// 회사명
    pub corp_name: String,
    /// 보고서명
    pub report_nm: String,
    /// 접수일자 (YYYYMMDD)
    pub rcept_dt: String,
}

/// OpenDART list.json 응답.
#[derive(Debug, Deserialize)]
struct DartListResponse {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    list: Option<Vec<DartNotice>>,
}

/// OpenDART API 클라이언트.
#[derive(Clone)]
pub struct DartApiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl DartApiClient {
    /// 새 클라이언트 생성. `api_key`가 None이거나 빈 문자열이면
    /// 모든 조회가 빈 결과를 반환합니다.
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: BASE_URL.to_string(),
        }
    }

    /// 테스트용 base URL 오버라이드.
    #[doc(hidden)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// API 키 설정 여부.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// 최근 공시 목록 조회 (최근 3일, 상위 10건).
    pub async fn fetch_recent_notices(&self) -> Result<Vec<DartNotice>> {
        let today = Utc::now().date_naive();
        self.fetch_notices_in_range(today - ChronoDuration::days(LOOKBACK_DAYS), today)
            .await
    }

    /// 지정한 날짜 범위의 공시 목록 조회.
    pub async fn fetch_notices_in_range(
        &self,
        begin: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DartNotice>> {
        let Some(api_key) = &self.api_key else {
            return Ok(Vec::new());
        };

        let url = format!("{}/api/list.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("crtfc_key", api_key.as_str()),
                ("bgn_de", &begin.format("%Y%m%d").to_string()),
                ("end_de", &end.format("%Y%m%d").to_string()),
                ("page_count", "20"),
                ("sort", "date"),
                ("sort_mth", "desc"),
            ])
            .send()
            .await?;

        let body: DartListResponse = response.json().await?;

        if body.status != "000" {
            // 013은 조회 데이터 없음
            if body.status != "013" {
                warn!(status = %body.status, message = %body.message, "DART API 에러");
            }
            return Ok(Vec::new());
        }

        let mut notices = body.list.unwrap_or_default();
        notices.truncate(MAX_NOTICES);
        Ok(notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_missing_api_key_returns_empty() {
        let client = DartApiClient::new(None);
        let notices = client.fetch_recent_notices().await.unwrap();
        assert!(notices.is_empty());

        let client = DartApiClient::new(Some("  ".to_string()));
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn test_fetch_notices_parses_list() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/list.json")
            .match_query(Matcher::UrlEncoded("crtfc_key".into(), "test-key".into()))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "status": "000",
                    "message": "정상",
                    "list": [
                        {"rcept_no": "20260830000001", "corp_name": "삼성전자",
                         "report_nm": "주요사항보고서", "rcept_dt": "20260830"},
                        {"rcept_no": "20260830000002", "corp_name": "SK하이닉스",
                         "report_nm": "단일판매ㆍ공급계약체결", "rcept_dt": "20260829"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let client =
            DartApiClient::new(Some("test-key".to_string())).with_base_url(server.url());
        let notices = client
            .fetch_notices_in_range(date(2026, 8, 27), date(2026, 8, 30))
            .await
            .unwrap();

        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].corp_name, "삼성전자");
        assert_eq!(notices[1].rcept_dt, "20260829");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_013_is_empty_not_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/list.json")
            .match_query(Matcher::Any)
            .with_body(r#"{"status": "013", "message": "조회된 데이타가 없습니다."}"#)
            .create_async()
            .await;

        let client = DartApiClient::new(Some("key".to_string())).with_base_url(server.url());
        let notices = client
            .fetch_notices_in_range(date(2026, 8, 27), date(2026, 8, 30))
            .await
            .unwrap();

        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_truncates_to_ten() {
        let items: Vec<String> = (0..20)
            .map(|i| {
                format!(
                    r#"{{"rcept_no": "{i}", "corp_name": "c{i}", "report_nm": "r", "rcept_dt": "20260830"}}"#
                )
            })
            .collect();
        let body = format!(
            r#"{{"status": "000", "message": "정상", "list": [{}]}}"#,
            items.join(",")
        );

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/list.json")
            .match_query(Matcher::Any)
            .with_body(body)
            .create_async()
            .await;

        let client = DartApiClient::new(Some("key".to_string())).with_base_url(server.url());
        let notices = client
            .fetch_notices_in_range(date(2026, 8, 27), date(2026, 8, 30))
            .await
            .unwrap();

        assert_eq!(notices.len(), 10);
    }
}
