//! 인사이트 스냅샷 저장소.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// 분석 스냅샷 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InsightSnapshotRecord {
    pub id: Uuid,
    pub mode_type: String,
    /// 분석 결과 전체 (layout + widgets + raw_data).
    pub payload: Value,
    pub fact_sheet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// 스냅샷 생성 입력.
#[derive(Debug, Clone)]
pub struct SnapshotInput {
    pub mode_type: String,
    pub payload: Value,
    pub fact_sheet_id: Option<Uuid>,
}

/// 스냅샷 저장소.
pub struct SnapshotRepository;

impl SnapshotRepository {
    /// 스냅샷 저장.
    pub async fn create(
        pool: &PgPool,
        input: SnapshotInput,
    ) -> Result<InsightSnapshotRecord, sqlx::Error> {
        sqlx::query_as::<_, InsightSnapshotRecord>(
            r#"
            INSERT INTO insight_snapshots (mode_type, payload, fact_sheet_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&input.mode_type)
        .bind(&input.payload)
        .bind(input.fact_sheet_id)
        .fetch_one(pool)
        .await
    }

    /// 최신 스냅샷 조회. 없으면 `None`.
    pub async fn find_latest(pool: &PgPool) -> Result<Option<InsightSnapshotRecord>, sqlx::Error> {
        sqlx::query_as::<_, InsightSnapshotRecord>(
            r#"
            SELECT * FROM insight_snapshots
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await
    }
}
