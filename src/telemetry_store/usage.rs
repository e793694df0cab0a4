//! `app_usage` table access

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::error::StoreResult;
use crate::types::{AppUsage, TelemetryFilter, UsageDetails};
use crate::validation::validate_usage;

use super::{json_column, push_filter, timestamp_column, TelemetryStore};

impl TelemetryStore {
    /// Insert usage rows in one transaction and return them with their ids
    pub async fn insert_usage(&self, mut rows: Vec<AppUsage>) -> StoreResult<Vec<AppUsage>> {
        for row in &rows {
            validate_usage(row)?;
        }

        let mut tx = self.pool.begin().await?;
        for row in &mut rows {
            let details = serde_json::to_string(&row.details)?;
            let metadata = row.metadata.as_ref().map(|m| m.to_string());
            let result = sqlx::query(
                "INSERT INTO app_usage
                    (session_id, event_id, action_type, timestamp, url, details, metadata, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&row.session_id)
            .bind(row.event_id)
            .bind(&row.action_type)
            .bind(row.timestamp.timestamp_millis())
            .bind(&row.url)
            .bind(details)
            .bind(metadata)
            .bind(row.created_at.timestamp_millis())
            .execute(&mut *tx)
            .await?;
            row.id = result.last_insert_rowid();
        }
        tx.commit().await?;

        tracing::debug!(count = rows.len(), "usage rows inserted");
        Ok(rows)
    }

    /// List usage rows, newest first
    pub async fn list_usage(&self, filter: &TelemetryFilter) -> StoreResult<Vec<AppUsage>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM app_usage");
        push_filter(&mut query, filter, "action_type");

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(usage_from_row).collect()
    }

    /// Usage rows that reference `event_id`, oldest first
    pub async fn usage_for_event(&self, event_id: i64) -> StoreResult<Vec<AppUsage>> {
        let rows = sqlx::query(
            "SELECT * FROM app_usage WHERE event_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(usage_from_row).collect()
    }
}

fn usage_from_row(row: &SqliteRow) -> StoreResult<AppUsage> {
    let details: String = row.try_get("details")?;
    let details: UsageDetails = serde_json::from_str(&details)?;

    Ok(AppUsage {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        event_id: row.try_get("event_id")?,
        action_type: row.try_get("action_type")?,
        timestamp: timestamp_column(row.try_get("timestamp")?, "timestamp")?,
        url: row.try_get("url")?,
        details,
        metadata: json_column(row.try_get("metadata")?)?,
        created_at: timestamp_column(row.try_get("created_at")?, "created_at")?,
    })
}
