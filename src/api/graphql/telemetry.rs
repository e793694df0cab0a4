//! Telemetry mutations and queries

use async_graphql::{Context, Object};
use chrono::{DateTime, Utc};

use crate::api::extractors::ClientIp;
use crate::telemetry_store::TelemetryStore;
use crate::types::{
    AppEvent, AppEventInput, AppPerformance, AppPerformanceInput, AppUsage, AppUsageInput,
    TelemetryFilter,
};

fn request_ip(ctx: &Context<'_>) -> String {
    ctx.data_opt::<ClientIp>()
        .copied()
        .unwrap_or_default()
        .0
        .to_string()
}

fn list_filter(
    limit: Option<i64>,
    offset: Option<i64>,
    session_id: Option<String>,
    kind: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
) -> TelemetryFilter {
    TelemetryFilter {
        session_id,
        kind,
        start_date,
        end_date,
        ..TelemetryFilter::new(limit, offset)
    }
}

#[derive(Default)]
pub struct TelemetryQuery;

#[Object]
impl TelemetryQuery {
    /// Recorded events, newest first
    async fn app_events(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        offset: Option<i64>,
        session_id: Option<String>,
        event_type: Option<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> async_graphql::Result<Vec<AppEvent>> {
        let store = ctx.data::<TelemetryStore>()?;
        let filter = list_filter(limit, offset, session_id, event_type, start_date, end_date);
        Ok(store.list_events(&filter).await?)
    }

    async fn app_performance(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        offset: Option<i64>,
        session_id: Option<String>,
        metric_type: Option<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> async_graphql::Result<Vec<AppPerformance>> {
        let store = ctx.data::<TelemetryStore>()?;
        let filter = list_filter(limit, offset, session_id, metric_type, start_date, end_date);
        Ok(store.list_performance(&filter).await?)
    }

    async fn app_usage(
        &self,
        ctx: &Context<'_>,
        limit: Option<i64>,
        offset: Option<i64>,
        session_id: Option<String>,
        action_type: Option<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> async_graphql::Result<Vec<AppUsage>> {
        let store = ctx.data::<TelemetryStore>()?;
        let filter = list_filter(limit, offset, session_id, action_type, start_date, end_date);
        Ok(store.list_usage(&filter).await?)
    }
}

#[derive(Default)]
pub struct TelemetryMutation;

#[Object]
impl TelemetryMutation {
    /// Record one event. Device, browser and OS are derived from `userAgent`.
    async fn track_event(
        &self,
        ctx: &Context<'_>,
        input: AppEventInput,
    ) -> async_graphql::Result<AppEvent> {
        let mut rows = store_events(ctx, vec![input]).await?;
        rows.pop()
            .ok_or_else(|| async_graphql::Error::new("event was not stored"))
    }

    /// Record several events atomically
    async fn track_events_batch(
        &self,
        ctx: &Context<'_>,
        events: Vec<AppEventInput>,
    ) -> async_graphql::Result<Vec<AppEvent>> {
        store_events(ctx, events).await
    }

    async fn track_performance(
        &self,
        ctx: &Context<'_>,
        input: AppPerformanceInput,
    ) -> async_graphql::Result<AppPerformance> {
        let mut rows = store_performance(ctx, vec![input]).await?;
        rows.pop()
            .ok_or_else(|| async_graphql::Error::new("performance row was not stored"))
    }

    async fn track_performance_batch(
        &self,
        ctx: &Context<'_>,
        performance: Vec<AppPerformanceInput>,
    ) -> async_graphql::Result<Vec<AppPerformance>> {
        store_performance(ctx, performance).await
    }

    async fn track_usage(
        &self,
        ctx: &Context<'_>,
        input: AppUsageInput,
    ) -> async_graphql::Result<AppUsage> {
        let mut rows = store_usage(ctx, vec![input]).await?;
        rows.pop()
            .ok_or_else(|| async_graphql::Error::new("usage row was not stored"))
    }

    async fn track_usage_batch(
        &self,
        ctx: &Context<'_>,
        usage: Vec<AppUsageInput>,
    ) -> async_graphql::Result<Vec<AppUsage>> {
        store_usage(ctx, usage).await
    }
}

async fn store_events(
    ctx: &Context<'_>,
    inputs: Vec<AppEventInput>,
) -> async_graphql::Result<Vec<AppEvent>> {
    let store = ctx.data::<TelemetryStore>()?;
    let ip_address = request_ip(ctx);
    let now = Utc::now();

    let events = inputs
        .into_iter()
        .map(|input| AppEvent::from_input(input, ip_address.clone(), now))
        .collect();
    let stored = store.insert_events(events).await.map_err(|e| {
        tracing::warn!(error = %e, "rejected event batch");
        e
    })?;

    tracing::info!(count = stored.len(), ip = %ip_address, "tracked events");
    Ok(stored)
}

async fn store_performance(
    ctx: &Context<'_>,
    inputs: Vec<AppPerformanceInput>,
) -> async_graphql::Result<Vec<AppPerformance>> {
    let store = ctx.data::<TelemetryStore>()?;
    let now = Utc::now();

    let rows = inputs
        .into_iter()
        .map(|input| AppPerformance::from_input(input, now))
        .collect();
    let stored = store.insert_performance(rows).await.map_err(|e| {
        tracing::warn!(error = %e, "rejected performance batch");
        e
    })?;

    tracing::debug!(count = stored.len(), "tracked performance");
    Ok(stored)
}

async fn store_usage(
    ctx: &Context<'_>,
    inputs: Vec<AppUsageInput>,
) -> async_graphql::Result<Vec<AppUsage>> {
    let store = ctx.data::<TelemetryStore>()?;
    let now = Utc::now();

    let rows = inputs
        .into_iter()
        .map(|input| AppUsage::from_input(input, now))
        .collect();
    let stored = store.insert_usage(rows).await.map_err(|e| {
        tracing::warn!(error = %e, "rejected usage batch");
        e
    })?;

    tracing::debug!(count = stored.len(), "tracked usage");
    Ok(stored)
}
