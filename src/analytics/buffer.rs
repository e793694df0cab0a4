//! Client-side telemetry queues
//!
//! Events travel in batches through one mutation. Performance and usage
//! entries are sent one request each. The two paths fail differently: a
//! failed event batch goes back to the head of its queue, while a failed
//! performance or usage flush drops whatever was not yet sent.

use chrono::Utc;
use serde_json::{json, Value};

use crate::error::TransportError;
use crate::types::{
    AppEventInput, AppPerformanceInput, AppUsageInput, PerformanceDetails, UsageDetails,
};

use super::session::Session;
use super::transport::Transport;

/// Page and device facts stamped onto every event
#[derive(Debug, Clone, PartialEq)]
pub struct ClientContext {
    pub url: String,
    pub domain: String,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub language: String,
    pub timezone: Option<String>,
    pub screen_width: i32,
    pub screen_height: i32,
    pub viewport_width: i32,
    pub viewport_height: i32,
}

impl Default for ClientContext {
    fn default() -> Self {
        Self {
            url: "http://localhost/".to_string(),
            domain: "localhost".to_string(),
            referrer: None,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
            language: "en-US".to_string(),
            timezone: None,
            screen_width: 0,
            screen_height: 0,
            viewport_width: 0,
            viewport_height: 0,
        }
    }
}

/// Event to track; unset page fields come from the [`ClientContext`]
#[derive(Debug, Clone, Default)]
pub struct EventData {
    pub event_type: String,
    pub url: Option<String>,
    pub domain: Option<String>,
    pub referrer: Option<String>,
    pub metadata: Option<Value>,
}

impl EventData {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceData {
    pub metric_type: String,
    pub url: Option<String>,
    pub details: PerformanceDetails,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct UsageData {
    pub action_type: String,
    pub url: Option<String>,
    pub details: UsageDetails,
    pub metadata: Option<Value>,
}

/// Three telemetry queues in front of a [`Transport`]
pub struct AnalyticsBuffer<T: Transport> {
    transport: T,
    session: Session,
    context: ClientContext,
    batch_size: usize,
    events: Vec<AppEventInput>,
    performance: Vec<AppPerformanceInput>,
    usage: Vec<AppUsageInput>,
}

impl<T: Transport> AnalyticsBuffer<T> {
    pub const DEFAULT_BATCH_SIZE: usize = 10;

    pub fn new(transport: T, session: Session, context: ClientContext) -> Self {
        Self::with_batch_size(transport, session, context, Self::DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(
        transport: T,
        session: Session,
        context: ClientContext,
        batch_size: usize,
    ) -> Self {
        Self {
            transport,
            session,
            context,
            batch_size: batch_size.max(1),
            events: Vec::new(),
            performance: Vec::new(),
            usage: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn pending_events(&self) -> &[AppEventInput] {
        &self.events
    }

    pub fn pending_performance(&self) -> &[AppPerformanceInput] {
        &self.performance
    }

    pub fn pending_usage(&self) -> &[AppUsageInput] {
        &self.usage
    }

    /// Queue an event, flushing the event queue once it is full
    pub async fn track_event(&mut self, data: EventData) -> Result<(), TransportError> {
        let ctx = &self.context;
        self.events.push(AppEventInput {
            event_type: data.event_type,
            timestamp: Some(Utc::now()),
            url: data.url.unwrap_or_else(|| ctx.url.clone()),
            domain: data.domain.unwrap_or_else(|| ctx.domain.clone()),
            referrer: data.referrer.or_else(|| ctx.referrer.clone()),
            user_agent: ctx.user_agent.clone(),
            language: ctx.language.clone(),
            screen_width: ctx.screen_width,
            screen_height: ctx.screen_height,
            viewport_width: ctx.viewport_width,
            viewport_height: ctx.viewport_height,
            timezone: ctx.timezone.clone(),
            session_id: self.session.id().to_string(),
            metadata: data.metadata,
            ..Default::default()
        });

        if self.events.len() >= self.batch_size {
            self.flush_events().await?;
        }
        Ok(())
    }

    /// Queue a performance entry, flushing that queue once it is full
    pub async fn track_performance(&mut self, data: PerformanceData) {
        self.performance.push(AppPerformanceInput {
            session_id: self.session.id().to_string(),
            event_id: None,
            metric_type: data.metric_type,
            timestamp: Some(Utc::now()),
            url: data.url.unwrap_or_else(|| self.context.url.clone()),
            details: data.details,
            metadata: data.metadata,
        });

        if self.performance.len() >= self.batch_size {
            self.flush_performance().await;
        }
    }

    /// Queue a usage entry stamped with the session clocks
    pub async fn track_usage(&mut self, data: UsageData) {
        let mut details = data.details;
        details.session_start_time = Some(self.session.started_at());
        details.page_view_duration = Some(self.session.page_view_duration());

        self.usage.push(AppUsageInput {
            session_id: self.session.id().to_string(),
            event_id: None,
            action_type: data.action_type,
            timestamp: Some(Utc::now()),
            url: data.url.unwrap_or_else(|| self.context.url.clone()),
            details,
            metadata: data.metadata,
        });

        if self.usage.len() >= self.batch_size {
            self.flush_usage().await;
        }
    }

    /// Start a new page view and queue a `visit` event
    pub async fn track_page_view(&mut self) -> Result<(), TransportError> {
        self.session.restart_page_view();
        let mut event = EventData::new("visit");
        event.metadata = Some(json!({ "timestamp": Utc::now().to_rfc3339() }));
        self.track_event(event).await
    }

    /// Record a page being hidden or shown again
    pub async fn track_visibility(&mut self, hidden: bool) {
        let mut details = UsageDetails::default();
        if hidden {
            details.navigation_action = Some("page_hidden".to_string());
            details.time_spent_on_page = Some(self.session.page_view_duration());
        } else {
            self.session.restart_page_view();
            details.navigation_action = Some("page_visible".to_string());
        }

        self.track_usage(UsageData {
            action_type: "navigation".to_string(),
            details,
            ..Default::default()
        })
        .await;
    }

    /// Queue timing of one GraphQL round trip
    pub async fn track_graphql_query(
        &mut self,
        query_name: &str,
        response_time: f64,
        query_size: Option<i64>,
        response_size: Option<i64>,
    ) {
        self.track_performance(PerformanceData {
            metric_type: "graphql_query".to_string(),
            details: PerformanceDetails {
                graphql_query_name: Some(query_name.to_string()),
                graphql_response_time: Some(response_time),
                graphql_query_size: query_size,
                graphql_response_size: response_size,
                ..Default::default()
            },
            ..Default::default()
        })
        .await;
    }

    /// Send queued events as one batch; on failure they return to the head
    pub async fn flush_events(&mut self) -> Result<(), TransportError> {
        if self.events.is_empty() {
            return Ok(());
        }

        let mut batch = std::mem::take(&mut self.events);
        match self.transport.send_events(&batch).await {
            Ok(()) => {
                tracing::debug!(count = batch.len(), "flushed events");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(count = batch.len(), error = %e, "event flush failed, requeued");
                batch.append(&mut self.events);
                self.events = batch;
                Err(e)
            }
        }
    }

    /// Send queued performance entries one by one. Returns how many were
    /// delivered; everything after the first failure is dropped.
    pub async fn flush_performance(&mut self) -> usize {
        let entries = std::mem::take(&mut self.performance);
        let total = entries.len();
        let mut sent = 0;
        for entry in &entries {
            if let Err(e) = self.transport.send_performance(entry).await {
                tracing::warn!(sent, dropped = total - sent, error = %e, "performance flush failed");
                break;
            }
            sent += 1;
        }
        sent
    }

    /// Send queued usage entries one by one, dropping the rest on failure
    pub async fn flush_usage(&mut self) -> usize {
        let entries = std::mem::take(&mut self.usage);
        let total = entries.len();
        let mut sent = 0;
        for entry in &entries {
            if let Err(e) = self.transport.send_usage(entry).await {
                tracing::warn!(sent, dropped = total - sent, error = %e, "usage flush failed");
                break;
            }
            sent += 1;
        }
        sent
    }

    /// Flush all three queues
    pub async fn flush(&mut self) -> Result<(), TransportError> {
        let events = self.flush_events().await;
        self.flush_performance().await;
        self.flush_usage().await;
        events
    }
}
