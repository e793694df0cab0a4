//! `app_performance` table access

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::error::StoreResult;
use crate::types::{AppPerformance, PerformanceDetails, TelemetryFilter};
use crate::validation::validate_performance;

use super::{json_column, push_filter, timestamp_column, TelemetryStore};

impl TelemetryStore {
    /// Insert performance rows in one transaction and return them with their ids
    pub async fn insert_performance(
        &self,
        mut rows: Vec<AppPerformance>,
    ) -> StoreResult<Vec<AppPerformance>> {
        for row in &rows {
            validate_performance(row)?;
        }

        let mut tx = self.pool.begin().await?;
        for row in &mut rows {
            let details = serde_json::to_string(&row.details)?;
            let metadata = row.metadata.as_ref().map(|m| m.to_string());
            let result = sqlx::query(
                "INSERT INTO app_performance
                    (session_id, event_id, metric_type, timestamp, url, details, metadata, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&row.session_id)
            .bind(row.event_id)
            .bind(&row.metric_type)
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

        tracing::debug!(count = rows.len(), "performance rows inserted");
        Ok(rows)
    }

    /// List performance rows, newest first
    pub async fn list_performance(&self, filter: &TelemetryFilter) -> StoreResult<Vec<AppPerformance>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM app_performance");
        push_filter(&mut query, filter, "metric_type");

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(performance_from_row).collect()
    }

    /// Performance rows that reference `event_id`, oldest first
    pub async fn performance_for_event(&self, event_id: i64) -> StoreResult<Vec<AppPerformance>> {
        let rows = sqlx::query(
            "SELECT * FROM app_performance WHERE event_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(performance_from_row).collect()
    }
}

fn performance_from_row(row: &SqliteRow) -> StoreResult<AppPerformance> {
    let details: String = row.try_get("details")?;
    let details: PerformanceDetails = serde_json::from_str(&details)?;

    Ok(AppPerformance {
        id: row.try_get("id")?,
        session_id: row.try_get("session_id")?,
        event_id: row.try_get("event_id")?,
        metric_type: row.try_get("metric_type")?,
        timestamp: timestamp_column(row.try_get("timestamp")?, "timestamp")?,
        url: row.try_get("url")?,
        details,
        metadata: json_column(row.try_get("metadata")?)?,
        created_at: timestamp_column(row.try_get("created_at")?, "created_at")?,
    })
}
