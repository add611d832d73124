//! 리서치 리포트 저장소.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// 거장 페르소나 리서치 리포트 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResearchReportRecord {
    pub id: Uuid,
    pub persona_id: String,
    pub persona_name: String,
    pub title: String,
    pub summary: String,
    /// 마크다운 본문.
    pub content: String,
    pub fact_sheet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// 리포트 생성 입력.
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub persona_id: String,
    pub persona_name: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub fact_sheet_id: Option<Uuid>,
}

/// 리포트 저장소.
pub struct ReportRepository;

impl ReportRepository {
    /// 리포트 저장.
    pub async fn create(
        pool: &PgPool,
        input: ReportInput,
    ) -> Result<ResearchReportRecord, sqlx::Error> {
        sqlx::query_as::<_, ResearchReportRecord>(
            r#"
            INSERT INTO research_reports (
                persona_id, persona_name, title, summary, content, fact_sheet_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&input.persona_id)
        .bind(&input.persona_name)
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.content)
        .bind(input.fact_sheet_id)
        .fetch_one(pool)
        .await
    }

    /// 리포트 목록 조회.
    ///
    /// `persona_id`가 주어지면 해당 페르소나의 최신 리포트 1건,
    /// 없으면 전체 최신 10건을 반환합니다.
    pub async fn list(
        pool: &PgPool,
        persona_id: Option<&str>,
    ) -> Result<Vec<ResearchReportRecord>, sqlx::Error> {
        match persona_id {
            Some(persona_id) => {
                sqlx::query_as::<_, ResearchReportRecord>(
                    r#"
                    SELECT * FROM research_reports
                    WHERE persona_id = $1
                    ORDER BY created_at DESC
                    LIMIT 1
                    "#,
                )
                .bind(persona_id)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ResearchReportRecord>(
                    r#"
                    SELECT * FROM research_reports
                    ORDER BY created_at DESC
                    LIMIT 10
                    "#,
                )
                .fetch_all(pool)
                .await
            }
        }
    }
}
