//! Telemetry Store - relational store for client analytics
//!
//! Three append-only tables hold events, performance measurements and usage
//! interactions. Performance and usage rows may point at an event through a
//! soft `event_id` reference: it is indexed but never enforced, so rows that
//! arrive before (or without) their event are still accepted.
//!
//! # Layout
//!
//! ```text
//! app_events ◄─ ─ ─ event_id ─ ─ ─ app_performance
//!     ▲
//!     └─ ─ ─ ─ ─ event_id ─ ─ ─ ─ ─ app_usage
//! ```
//!
//! Timestamps are stored as epoch milliseconds. The free-form measurement
//! and interaction details are stored as a JSON column.

mod events;
mod performance;
mod schema;
mod usage;

use std::time::Duration;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};

use crate::error::{StoreError, StoreResult};
use crate::types::TelemetryFilter;
use crate::utils::from_millis;

/// Default pool size, matching the analytics database settings
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Handle to the analytics database. Cheap to clone.
#[derive(Clone)]
pub struct TelemetryStore {
    pool: SqlitePool,
}

impl TelemetryStore {
    /// Connect to `database_url` and create the tables if they are missing.
    ///
    /// In-memory databases are pinned to a single long-lived connection,
    /// since every new connection would otherwise see an empty database.
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let in_memory = database_url.contains(":memory:");

        let mut options = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { max_connections.max(1) })
            .acquire_timeout(Duration::from_secs(30));
        if in_memory {
            options = options.idle_timeout(None).max_lifetime(None);
        }

        let pool = options.connect(database_url).await?;
        let store = Self { pool };
        store.migrate().await?;

        tracing::info!(url = %database_url, "analytics store connected");
        Ok(store)
    }

    /// Wrap an existing pool (tables are not created)
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in schema::STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Append the shared `WHERE` / `ORDER BY` / `LIMIT` clauses of a list query
pub(crate) fn push_filter(
    query: &mut QueryBuilder<'_, Sqlite>,
    filter: &TelemetryFilter,
    kind_column: &str,
) {
    query.push(" WHERE 1 = 1");
    if let Some(session_id) = &filter.session_id {
        query.push(" AND session_id = ").push_bind(session_id.clone());
    }
    if let Some(kind) = &filter.kind {
        query
            .push(format!(" AND {kind_column} = "))
            .push_bind(kind.clone());
    }
    if let Some(start) = filter.start_date {
        query
            .push(" AND timestamp >= ")
            .push_bind(start.timestamp_millis());
    }
    if let Some(end) = filter.end_date {
        query
            .push(" AND timestamp <= ")
            .push_bind(end.timestamp_millis());
    }
    query
        .push(" ORDER BY timestamp DESC, id DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);
}

/// Decode a stored millisecond timestamp
pub(crate) fn timestamp_column(
    millis: i64,
    column: &str,
) -> StoreResult<chrono::DateTime<chrono::Utc>> {
    from_millis(millis).ok_or_else(|| StoreError::Corrupt {
        line: 0,
        reason: format!("{column} out of range: {millis}"),
    })
}

/// Decode an optional JSON text column
pub(crate) fn json_column(text: Option<String>) -> StoreResult<Option<serde_json::Value>> {
    match text {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
pub(crate) async fn memory_store() -> TelemetryStore {
    match TelemetryStore::connect("sqlite::memory:", 1).await {
        Ok(store) => store,
        Err(e) => panic!("in-memory analytics store: {e}"),
    }
}
