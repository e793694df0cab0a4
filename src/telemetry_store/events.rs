//! `app_events` table access

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::error::StoreResult;
use crate::types::{AppEvent, TelemetryFilter};
use crate::validation::validate_event;

use super::{json_column, push_filter, timestamp_column, TelemetryStore};

const INSERT_EVENT: &str = "INSERT INTO app_events (
    event_type, timestamp, url, domain, referrer, user_agent, language,
    screen_width, screen_height, viewport_width, viewport_height, ip_address,
    country, region, city, timezone, session_id, user_id, device_type,
    browser, operating_system, is_bot, metadata, created_at
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

impl TelemetryStore {
    /// Insert events in one transaction and return them with their ids.
    ///
    /// Every row is validated first; one invalid row rejects the batch.
    pub async fn insert_events(&self, mut events: Vec<AppEvent>) -> StoreResult<Vec<AppEvent>> {
        for event in &events {
            validate_event(event)?;
        }

        let mut tx = self.pool.begin().await?;
        for event in &mut events {
            let metadata = event.metadata.as_ref().map(|m| m.to_string());
            let result = sqlx::query(INSERT_EVENT)
                .bind(&event.event_type)
                .bind(event.timestamp.timestamp_millis())
                .bind(&event.url)
                .bind(&event.domain)
                .bind(&event.referrer)
                .bind(&event.user_agent)
                .bind(&event.language)
                .bind(event.screen_width)
                .bind(event.screen_height)
                .bind(event.viewport_width)
                .bind(event.viewport_height)
                .bind(&event.ip_address)
                .bind(&event.country)
                .bind(&event.region)
                .bind(&event.city)
                .bind(&event.timezone)
                .bind(&event.session_id)
                .bind(&event.user_id)
                .bind(&event.device_type)
                .bind(&event.browser)
                .bind(&event.operating_system)
                .bind(event.is_bot)
                .bind(metadata)
                .bind(event.created_at.timestamp_millis())
                .execute(&mut *tx)
                .await?;
            event.id = result.last_insert_rowid();
        }
        tx.commit().await?;

        tracing::debug!(count = events.len(), "app events inserted");
        Ok(events)
    }

    /// List events, newest first
    pub async fn list_events(&self, filter: &TelemetryFilter) -> StoreResult<Vec<AppEvent>> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM app_events");
        push_filter(&mut query, filter, "event_type");

        let rows = query.build().fetch_all(&self.pool).await?;
        rows.iter().map(event_from_row).collect()
    }

    /// Fetch one event by id
    pub async fn get_event(&self, id: i64) -> StoreResult<Option<AppEvent>> {
        let row = sqlx::query("SELECT * FROM app_events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(event_from_row).transpose()
    }
}

fn event_from_row(row: &SqliteRow) -> StoreResult<AppEvent> {
    Ok(AppEvent {
        id: row.try_get("id")?,
        event_type: row.try_get("event_type")?,
        timestamp: timestamp_column(row.try_get("timestamp")?, "timestamp")?,
        url: row.try_get("url")?,
        domain: row.try_get("domain")?,
        referrer: row.try_get("referrer")?,
        user_agent: row.try_get("user_agent")?,
        language: row.try_get("language")?,
        screen_width: row.try_get("screen_width")?,
        screen_height: row.try_get("screen_height")?,
        viewport_width: row.try_get("viewport_width")?,
        viewport_height: row.try_get("viewport_height")?,
        ip_address: row.try_get("ip_address")?,
        country: row.try_get("country")?,
        region: row.try_get("region")?,
        city: row.try_get("city")?,
        timezone: row.try_get("timezone")?,
        session_id: row.try_get("session_id")?,
        user_id: row.try_get("user_id")?,
        device_type: row.try_get("device_type")?,
        browser: row.try_get("browser")?,
        operating_system: row.try_get("operating_system")?,
        is_bot: row.try_get("is_bot")?,
        metadata: json_column(row.try_get("metadata")?)?,
        created_at: timestamp_column(row.try_get("created_at")?, "created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::error::StoreError;
    use crate::telemetry_store::memory_store;
    use crate::types::AppEventInput;

    fn event(session_id: &str, event_type: &str) -> AppEvent {
        AppEvent::from_input(
            AppEventInput {
                event_type: event_type.to_string(),
                url: "http://localhost:5173/".to_string(),
                domain: "localhost".to_string(),
                user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0".to_string(),
                language: "en-US".to_string(),
                screen_width: 1920,
                screen_height: 1080,
                viewport_width: 1280,
                viewport_height: 720,
                session_id: session_id.to_string(),
                metadata: Some(serde_json::json!({ "page": 1 })),
                ..Default::default()
            },
            "127.0.0.1".to_string(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_round_trips() {
        let store = memory_store().await;
        let inserted = store
            .insert_events(vec![event("s1", "visit"), event("s1", "click")])
            .await
            .unwrap();
        assert_eq!(inserted[0].id + 1, inserted[1].id);

        let loaded = store.get_event(inserted[0].id).await.unwrap().unwrap();
        assert_eq!(loaded.event_type, "visit");
        assert_eq!(loaded.browser.as_deref(), Some("Firefox"));
        assert_eq!(loaded.is_bot, Some(false));
        assert_eq!(loaded.metadata, Some(serde_json::json!({ "page": 1 })));
        assert_eq!(
            loaded.timestamp.timestamp_millis(),
            inserted[0].timestamp.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_invalid_row_rejects_whole_batch() {
        let store = memory_store().await;
        let bad = event("s1", &"x".repeat(51));

        let result = store.insert_events(vec![event("s1", "visit"), bad]).await;
        assert!(matches!(result, Err(StoreError::Validation(_))));

        let all = store.list_events(&TelemetryFilter::new(None, None)).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let store = memory_store().await;
        let now = Utc::now();

        let mut old = event("s1", "visit");
        old.timestamp = now - Duration::days(2);
        let mut recent = event("s1", "visit");
        recent.timestamp = now - Duration::hours(1);
        let other_session = event("s2", "visit");
        let other_type = event("s1", "click");

        store
            .insert_events(vec![old, recent.clone(), other_session, other_type])
            .await
            .unwrap();

        let mut filter = TelemetryFilter::new(None, None);
        filter.session_id = Some("s1".to_string());
        filter.kind = Some("visit".to_string());
        let found = store.list_events(&filter).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].timestamp > found[1].timestamp);

        filter.start_date = Some(now - Duration::days(1));
        let found = store.list_events(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].timestamp.timestamp_millis(),
            recent.timestamp.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_limit_and_offset() {
        let store = memory_store().await;
        store
            .insert_events((0..5).map(|_| event("s1", "visit")).collect())
            .await
            .unwrap();

        let page = store
            .list_events(&TelemetryFilter::new(Some(2), Some(4)))
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }
}
