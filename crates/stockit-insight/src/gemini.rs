//! Gemini Generative Language API 클라이언트.
//!
//! 분석 서비스는 불투명한 외부 capability로 취급합니다: 텍스트를 주면
//! 텍스트를 돌려받습니다. JSON 응답이 필요한 호출은
//! `GenerationConfig::json`으로 responseMimeType을 지정합니다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use stockit_core::{InsightError, InsightResult};

const BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// 전처리/요약용 경량 모델.
pub const MODEL_FLASH: &str = "gemini-2.5-flash";

/// 분석/레이아웃 생성용 모델.
pub const MODEL_PRO: &str = "gemini-2.5-pro";

/// 생성 파라미터.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

impl GenerationConfig {
    /// 일반 텍스트 출력.
    pub fn text(temperature: f32) -> Self {
        Self {
            temperature,
            response_mime_type: None,
        }
    }

    /// JSON 출력 강제.
    pub fn json(temperature: f32) -> Self {
        Self {
            temperature,
            response_mime_type: Some("application/json".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini API 클라이언트.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// 새 클라이언트 생성 (60초 타임아웃).
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("HTTP 클라이언트 생성 실패");

        Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// 테스트용 base URL 오버라이드.
    #[doc(hidden)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 프롬프트 목록으로 텍스트 생성.
    ///
    /// 각 프롬프트는 원본 시스템과 동일하게 별도의 user 메시지로
    /// 전달됩니다.
    pub async fn generate(
        &self,
        model: &str,
        config: &GenerationConfig,
        prompts: &[&str],
    ) -> InsightResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );

        let request = GenerateRequest {
            contents: prompts
                .iter()
                .map(|text| Content {
                    role: "user",
                    parts: vec![Part { text }],
                })
                .collect(),
            generation_config: config,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::Analysis(format!("Gemini 요청 실패: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InsightError::Analysis(format!(
                "Gemini API 에러 ({}): {}",
                status, body
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Analysis(format!("Gemini 응답 파싱 실패: {}", e)))?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| InsightError::Analysis("Gemini 응답이 비어 있습니다".to_string()))?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_generate_extracts_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "k".into()))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates": [{"content": {"parts": [{"text": "{\"mode_type\": \"active\"}"}]}}]}"#,
            )
            .create_async()
            .await;

        let client = GeminiClient::new("k").with_base_url(server.url());
        let text = client
            .generate(MODEL_PRO, &GenerationConfig::json(0.7), &["prompt"])
            .await
            .unwrap();

        assert_eq!(text, r#"{"mode_type": "active"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_empty_candidates_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = GeminiClient::new("k").with_base_url(server.url());
        let result = client
            .generate(MODEL_FLASH, &GenerationConfig::text(0.1), &["p"])
            .await;

        assert!(matches!(result, Err(InsightError::Analysis(_))));
    }

    #[tokio::test]
    async fn test_generate_http_error_is_analysis_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let client = GeminiClient::new("k").with_base_url(server.url());
        let result = client
            .generate(MODEL_PRO, &GenerationConfig::json(0.7), &["p"])
            .await;

        match result {
            Err(InsightError::Analysis(msg)) => assert!(msg.contains("429")),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}
