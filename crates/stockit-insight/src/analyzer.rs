//! Gemini 기반 시장 분석기.
//!
//! 2단계 파이프라인: Flash로 팩트 시트를 전처리(압축)한 뒤 Pro가
//! 위젯 레이아웃 JSON을 생성합니다. 전처리 실패는 치명적이지 않으며
//! 원문을 잘라서 대신 사용합니다.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use stockit_core::{InsightError, InsightResult, DEFAULT_MODE_TYPE};
use stockit_data::StructuredData;

use crate::gemini::{GeminiClient, GenerationConfig, MODEL_FLASH, MODEL_PRO};
use crate::personas::Persona;
use crate::prompts::{
    SYSTEM_PROMPT_MAIN, SYSTEM_PROMPT_REPORT_BODY, SYSTEM_PROMPT_REPORT_INTRO, SYSTEM_PROMPT_SUB,
};

/// 전처리 실패 시 원문을 자르는 길이 (문자 수).
const FALLBACK_TRUNCATE_CHARS: usize = 500;

fn default_mode_type() -> String {
    DEFAULT_MODE_TYPE.to_string()
}

/// 분석 결과: 위젯 레이아웃과 콘텐츠.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 운영 모드. 모델이 생략하면 "active".
    #[serde(default = "default_mode_type")]
    pub mode_type: String,
    /// 위젯 표시 순서.
    #[serde(default)]
    pub layout: Vec<String>,
    /// 위젯 이름 → 콘텐츠 객체.
    #[serde(default)]
    pub widgets: serde_json::Map<String, Value>,
    /// 수집 당시의 정형 수치 데이터. 하이드레이션 단계에서 채워집니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Value>,
}

/// 리포트 인트로 (제목 + 요약).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportIntro {
    pub title: String,
    pub summary: String,
}

/// 모델 응답에서 마크다운 코드 펜스를 벗겨냅니다.
///
/// responseMimeType을 지정해도 일부 응답이 ```json ... ``` 으로
/// 감싸져 오는 경우가 있습니다.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// 모델 출력 텍스트를 `AnalysisResult`로 파싱.
pub fn parse_analysis(text: &str) -> InsightResult<AnalysisResult> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(cleaned)
        .map_err(|e| InsightError::Analysis(format!("분석 결과 JSON 파싱 실패: {}", e)))
}

/// 정형 데이터를 분석 결과에 주입합니다.
///
/// 프론트엔드가 차트 등에 정확한 수치를 쓸 수 있도록 `raw_data` 전체와,
/// 레이아웃에 포함된 경우 SupplyTrend/MarketGauge 위젯의 `raw` 필드를
/// 채웁니다.
pub fn hydrate_raw_data(result: &mut AnalysisResult, structured: &StructuredData) {
    let market = serde_json::to_value(&structured.market).unwrap_or(Value::Null);
    let supply = serde_json::to_value(&structured.supply).unwrap_or(Value::Null);

    if let Some(Value::Object(widget)) = result.widgets.get_mut(stockit_core::SUPPLY_TREND) {
        widget.insert("raw".to_string(), supply.clone());
    }
    if let Some(Value::Object(widget)) = result.widgets.get_mut(stockit_core::MARKET_GAUGE) {
        widget.insert("raw".to_string(), market.clone());
    }

    result.raw_data = Some(serde_json::json!({
        "market": market,
        "supply": supply,
    }));
}

/// 문자 경계를 지키며 앞에서 최대 `max_chars` 글자를 취합니다.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// 시장 분석기. Gemini 호출을 캡슐화합니다.
#[derive(Clone)]
pub struct MarketAnalyzer {
    gemini: GeminiClient,
}

impl MarketAnalyzer {
    pub fn new(gemini: GeminiClient) -> Self {
        Self { gemini }
    }

    /// 1단계: Flash로 팩트 시트를 압축합니다.
    ///
    /// 실패해도 파이프라인은 계속됩니다. 원문 앞 500자를 대신 반환합니다.
    pub async fn preprocess(&self, fact_sheet: &str) -> String {
        let config = GenerationConfig::text(0.1);
        match self
            .gemini
            .generate(MODEL_FLASH, &config, &[SYSTEM_PROMPT_SUB, fact_sheet])
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "전처리 실패, 원문을 잘라서 사용합니다");
                truncate_chars(fact_sheet, FALLBACK_TRUNCATE_CHARS).to_string()
            }
        }
    }

    /// 2단계: Pro로 위젯 레이아웃을 생성하고 정형 데이터를 주입합니다.
    pub async fn analyze(
        &self,
        fact_sheet: &str,
        structured: Option<&StructuredData>,
    ) -> InsightResult<AnalysisResult> {
        let config = GenerationConfig::json(0.7);
        let sheet_prompt = format!("[Market Fact Sheet]\n{}", fact_sheet);
        let text = self
            .gemini
            .generate(MODEL_PRO, &config, &[SYSTEM_PROMPT_MAIN, &sheet_prompt])
            .await?;

        let mut result = parse_analysis(&text)?;
        if let Some(structured) = structured {
            hydrate_raw_data(&mut result, structured);
        }
        Ok(result)
    }

    /// 리포트 인트로 생성 (제목 + 요약, JSON).
    pub async fn report_intro(
        &self,
        persona: &Persona,
        fact_sheet: &str,
    ) -> InsightResult<ReportIntro> {
        let config = GenerationConfig::json(0.8);
        let persona_prompt = format!("{}\n\n{}", persona.prompt, SYSTEM_PROMPT_REPORT_INTRO);
        let sheet_prompt = format!("[Market Fact Sheet]\n{}", fact_sheet);
        let text = self
            .gemini
            .generate(MODEL_PRO, &config, &[&persona_prompt, &sheet_prompt])
            .await?;

        serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| InsightError::Analysis(format!("리포트 인트로 파싱 실패: {}", e)))
    }

    /// 리포트 본문 생성 (마크다운).
    pub async fn report_body(
        &self,
        persona: &Persona,
        fact_sheet: &str,
    ) -> InsightResult<String> {
        let config = GenerationConfig::text(0.7);
        let persona_prompt = format!("{}\n\n{}", persona.prompt, SYSTEM_PROMPT_REPORT_BODY);
        let sheet_prompt = format!("[Market Fact Sheet]\n{}", fact_sheet);
        self.gemini
            .generate(MODEL_FLASH, &config, &[&persona_prompt, &sheet_prompt])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockit_data::{MarketData, SupplyData};

    #[test]
    fn test_parse_analysis_plain_json() {
        let text = r#"{"mode_type": "active", "layout": ["HeroHeader"], "widgets": {"HeroHeader": {"title": "t"}}}"#;
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.mode_type, "active");
        assert_eq!(result.layout, vec!["HeroHeader"]);
        assert!(result.widgets.contains_key("HeroHeader"));
    }

    #[test]
    fn test_parse_analysis_strips_code_fences() {
        let text = "```json\n{\"layout\": [], \"widgets\": {}}\n```";
        let result = parse_analysis(text).unwrap();
        assert_eq!(result.mode_type, "active");
    }

    #[test]
    fn test_parse_analysis_defaults_mode_type() {
        let result = parse_analysis(r#"{"layout": [], "widgets": {}}"#).unwrap();
        assert_eq!(result.mode_type, "active");
    }

    #[test]
    fn test_parse_analysis_invalid_json() {
        assert!(matches!(
            parse_analysis("not json"),
            Err(InsightError::Analysis(_))
        ));
    }

    #[test]
    fn test_hydrate_raw_data_fills_widget_raw() {
        let mut result = parse_analysis(
            r#"{"layout": ["SupplyTrend"], "widgets": {"SupplyTrend": {"title": "수급"}, "NewsBrief": {"items": []}}}"#,
        )
        .unwrap();
        let structured = StructuredData {
            market: MarketData::default(),
            supply: SupplyData::default(),
        };

        hydrate_raw_data(&mut result, &structured);

        let supply_widget = result.widgets.get("SupplyTrend").unwrap();
        assert!(supply_widget.get("raw").is_some());
        assert_eq!(
            supply_widget.get("title").and_then(|v| v.as_str()),
            Some("수급")
        );
        // 레이아웃에 없는 위젯은 건드리지 않음
        assert!(result.widgets.get("NewsBrief").unwrap().get("raw").is_none());
        assert!(result.raw_data.is_some());
    }

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        let text = "가나다라마";
        assert_eq!(truncate_chars(text, 3), "가나다");
        assert_eq!(truncate_chars(text, 10), text);
    }
}
