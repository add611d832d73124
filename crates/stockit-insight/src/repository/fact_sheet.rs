//! 시장 팩트 시트 저장소.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// 팩트 시트 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FactSheetRecord {
    pub id: Uuid,
    /// 섹션별 한국어 텍스트 전문.
    pub raw_content: String,
    /// 수집 당시의 정형 수치 (market/supply).
    pub structured_data: Option<Value>,
    pub created_at: DateTime<Utc>,
}

/// 팩트 시트 생성 입력.
#[derive(Debug, Clone)]
pub struct FactSheetInput {
    pub raw_content: String,
    pub structured_data: Option<Value>,
}

/// 팩트 시트 저장소.
pub struct FactSheetRepository;

impl FactSheetRepository {
    /// 팩트 시트 저장.
    pub async fn create(
        pool: &PgPool,
        input: FactSheetInput,
    ) -> Result<FactSheetRecord, sqlx::Error> {
        sqlx::query_as::<_, FactSheetRecord>(
            r#"
            INSERT INTO market_fact_sheets (raw_content, structured_data)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&input.raw_content)
        .bind(&input.structured_data)
        .fetch_one(pool)
        .await
    }

    /// 최신 팩트 시트 조회. 없으면 `None`.
    pub async fn find_latest(pool: &PgPool) -> Result<Option<FactSheetRecord>, sqlx::Error> {
        sqlx::query_as::<_, FactSheetRecord>(
            r#"
            SELECT * FROM market_fact_sheets
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await
    }
}
