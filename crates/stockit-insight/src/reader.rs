//! 스냅샷 조회 레이어.
//!
//! 저장된 스냅샷은 불변입니다. NewsBrief 위젯에 대한 실제 뉴스 주입은
//! 조회 시점에 메모리에서만 이루어지며 저장된 payload는 변경되지
//! 않습니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use stockit_core::{InsightError, InsightResult, NEWS_BRIEF};

use crate::repository::{
    FactSheetRepository, NewsRepository, ReportRepository, ResearchReportRecord,
    SnapshotRepository,
};

/// NewsBrief 위젯에 주입되는 뉴스 항목.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsBriefItem {
    pub title: String,
    pub link: String,
    pub press: String,
    pub time: String,
}

/// API로 반환되는 최신 인사이트 뷰.
#[derive(Debug, Clone, Serialize)]
pub struct InsightView {
    pub id: Uuid,
    pub mode_type: String,
    pub payload: Value,
    pub fact_sheet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

fn db_err(e: sqlx::Error) -> InsightError {
    InsightError::Database(e.to_string())
}

/// 실제 뉴스 레코드를 NewsBrief 위젯에 주입합니다.
///
/// `widgets.NewsBrief`가 객체로 존재할 때만 그 `items` 필드를
/// 교체합니다. 위젯의 다른 필드와 형제 위젯은 건드리지 않습니다.
/// 주입할 항목이 없으면 모델이 생성한 items를 그대로 둡니다.
pub fn inject_news(payload: &mut Value, items: &[NewsBriefItem]) {
    if items.is_empty() {
        return;
    }

    let Some(widget) = payload
        .get_mut("widgets")
        .and_then(|w| w.get_mut(NEWS_BRIEF))
        .and_then(|w| w.as_object_mut())
    else {
        return;
    };

    let items_value = serde_json::to_value(items).unwrap_or(Value::Array(vec![]));
    widget.insert("items".to_string(), items_value);
}

/// 최신 인사이트 스냅샷 조회.
///
/// 스냅샷이 하나도 없으면 `Ok(None)`입니다. 빈 상태는 에러가 아닙니다.
pub async fn latest_insight(pool: &PgPool) -> InsightResult<Option<InsightView>> {
    let Some(snapshot) = SnapshotRepository::find_latest(pool).await.map_err(db_err)? else {
        return Ok(None);
    };

    let mut payload = snapshot.payload;

    if let Some(fact_sheet_id) = snapshot.fact_sheet_id {
        let items: Vec<NewsBriefItem> = NewsRepository::list_by_fact_sheet(pool, fact_sheet_id)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|n| NewsBriefItem {
                title: n.title,
                link: n.link,
                press: n.press,
                time: n.time,
            })
            .collect();

        inject_news(&mut payload, &items);
    }

    Ok(Some(InsightView {
        id: snapshot.id,
        mode_type: snapshot.mode_type,
        payload,
        fact_sheet_id: snapshot.fact_sheet_id,
        created_at: snapshot.created_at,
    }))
}

/// 리서치 리포트 목록 조회.
///
/// `persona_id`가 있으면 해당 페르소나의 최신 1건, 없으면 전체 최신
/// 10건을 반환합니다.
pub async fn list_reports(
    pool: &PgPool,
    persona_id: Option<&str>,
) -> InsightResult<Vec<ResearchReportRecord>> {
    ReportRepository::list(pool, persona_id).await.map_err(db_err)
}

/// 최신 팩트 시트의 원문 조회 (진단용).
pub async fn latest_fact_sheet_text(pool: &PgPool) -> InsightResult<Option<String>> {
    Ok(FactSheetRepository::find_latest(pool)
        .await
        .map_err(db_err)?
        .map(|s| s.raw_content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_items() -> Vec<NewsBriefItem> {
        vec![NewsBriefItem {
            title: "코스피 급등".to_string(),
            link: "https://finance.naver.com/news/1".to_string(),
            press: "연합뉴스".to_string(),
            time: "09:30".to_string(),
        }]
    }

    #[test]
    fn test_inject_news_replaces_items_only() {
        let mut payload = json!({
            "mode_type": "active",
            "layout": ["HeroHeader", "NewsBrief"],
            "widgets": {
                "HeroHeader": { "title": "시장 요약" },
                "NewsBrief": {
                    "title": "주요 뉴스",
                    "items": [{ "title": "모델이 지어낸 뉴스" }]
                }
            }
        });

        inject_news(&mut payload, &sample_items());

        let brief = &payload["widgets"]["NewsBrief"];
        assert_eq!(brief["title"], "주요 뉴스");
        assert_eq!(brief["items"][0]["title"], "코스피 급등");
        assert_eq!(brief["items"][0]["press"], "연합뉴스");
        // 형제 위젯은 그대로
        assert_eq!(payload["widgets"]["HeroHeader"]["title"], "시장 요약");
    }

    #[test]
    fn test_inject_news_missing_widget_is_noop() {
        let mut payload = json!({
            "widgets": { "HeroHeader": { "title": "t" } }
        });
        let before = payload.clone();

        inject_news(&mut payload, &sample_items());

        assert_eq!(payload, before);
    }

    #[test]
    fn test_inject_news_empty_items_keeps_model_output() {
        let mut payload = json!({
            "widgets": { "NewsBrief": { "items": [{ "title": "모델 뉴스" }] } }
        });
        let before = payload.clone();

        inject_news(&mut payload, &[]);

        assert_eq!(payload, before);
    }

    #[test]
    fn test_inject_news_non_object_payload_is_noop() {
        let mut payload = json!("not an object");
        inject_news(&mut payload, &sample_items());
        assert_eq!(payload, json!("not an object"));
    }
}
