//! 뉴스 헤드라인 저장소.
//!
//! 수집 사이클마다 팩트 시트에 연결된 헤드라인을 저장합니다.
//! Reader가 최신 스냅샷의 NewsBrief 위젯에 주입할 때 사용합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// 뉴스 헤드라인 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NewsItemRecord {
    pub id: Uuid,
    pub title: String,
    pub link: String,
    pub press: String,
    /// 원문 표기 그대로의 발행 시각 문자열.
    pub time: String,
    pub fact_sheet_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// 뉴스 헤드라인 생성 입력.
#[derive(Debug, Clone)]
pub struct NewsItemInput {
    pub title: String,
    pub link: String,
    pub press: String,
    pub time: String,
}

/// 뉴스 저장소.
pub struct NewsRepository;

impl NewsRepository {
    /// 팩트 시트에 연결된 헤드라인 일괄 저장.
    ///
    /// UNNEST로 한 번의 INSERT를 수행합니다. 빈 목록이면 즉시 0을
    /// 반환합니다.
    pub async fn insert_many(
        pool: &PgPool,
        fact_sheet_id: Uuid,
        items: &[NewsItemInput],
    ) -> Result<usize, sqlx::Error> {
        if items.is_empty() {
            return Ok(0);
        }

        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        let links: Vec<&str> = items.iter().map(|i| i.link.as_str()).collect();
        let presses: Vec<&str> = items.iter().map(|i| i.press.as_str()).collect();
        let times: Vec<&str> = items.iter().map(|i| i.time.as_str()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO insight_news (title, link, press, time, fact_sheet_id)
            SELECT t.title, t.link, t.press, t.time, $5
            FROM UNNEST($1::text[], $2::text[], $3::text[], $4::text[])
                AS t(title, link, press, time)
            "#,
        )
        .bind(&titles)
        .bind(&links)
        .bind(&presses)
        .bind(&times)
        .bind(fact_sheet_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() as usize)
    }

    /// 특정 팩트 시트의 헤드라인 목록 (수집 순서 유지).
    pub async fn list_by_fact_sheet(
        pool: &PgPool,
        fact_sheet_id: Uuid,
    ) -> Result<Vec<NewsItemRecord>, sqlx::Error> {
        sqlx::query_as::<_, NewsItemRecord>(
            r#"
            SELECT * FROM insight_news
            WHERE fact_sheet_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(fact_sheet_id)
        .fetch_all(pool)
        .await
    }
}
