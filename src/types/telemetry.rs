//! Telemetry record types for the analytics store
//!
//! Each record kind comes as a stored row (`AppEvent`, `AppPerformance`,
//! `AppUsage`) and as the input accepted by the track mutations. The inputs
//! are also what the analytics client queues and sends, so they serialize
//! with the same camelCase names the GraphQL schema uses.

use async_graphql::{ComplexObject, Context, InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::telemetry_store::TelemetryStore;
use crate::utils::UserAgentInfo;

/// Page view, click or custom event recorded by a client session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
#[graphql(complex)]
pub struct AppEvent {
    pub id: i64,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub domain: String,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub language: String,
    pub screen_width: i32,
    pub screen_height: i32,
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub ip_address: String,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub timezone: Option<String>,
    pub session_id: String,
    pub user_id: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub operating_system: Option<String>,
    pub is_bot: Option<bool>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[ComplexObject]
impl AppEvent {
    /// Performance rows that reference this event
    async fn performance_metrics(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AppPerformance>> {
        let store = ctx.data::<TelemetryStore>()?;
        Ok(store.performance_for_event(self.id).await?)
    }

    /// Usage rows that reference this event
    async fn usage_metrics(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<AppUsage>> {
        let store = ctx.data::<TelemetryStore>()?;
        Ok(store.usage_for_event(self.id).await?)
    }
}

/// Input for `trackEvent` / `trackEventsBatch`
///
/// Device, browser, OS and bot flags are derived server-side from
/// `userAgent`; the IP address comes from the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct AppEventInput {
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub url: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    pub user_agent: String,
    pub language: String,
    pub screen_width: i32,
    pub screen_height: i32,
    pub viewport_width: i32,
    pub viewport_height: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Optional measurements attached to a performance row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "PerformanceDetailsInput")]
pub struct PerformanceDetails {
    // Page load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_load_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom_content_loaded_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_contentful_paint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub largest_contentful_paint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_input_delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cumulative_layout_shift: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_interactive: Option<f64>,
    // Network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_lookup_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_connect_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_handshake_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_time: Option<f64>,
    // GraphQL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_query_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_response_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_query_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_response_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graphql_cache_hit: Option<bool>,
    // Resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_load_time: Option<f64>,
    // Connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_connection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downlink: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtt: Option<f64>,
    // Resource usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_usage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_usage: Option<f64>,
}

/// Performance measurement row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct AppPerformance {
    pub id: i64,
    pub session_id: String,
    pub event_id: Option<i64>,
    pub metric_type: String,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    #[serde(flatten)]
    #[graphql(flatten)]
    pub details: PerformanceDetails,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Input for `trackPerformance` / `trackPerformanceBatch`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct AppPerformanceInput {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub metric_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub url: String,
    #[serde(flatten)]
    #[graphql(flatten)]
    pub details: PerformanceDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Optional interaction details attached to a usage row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, SimpleObject, InputObject)]
#[serde(rename_all = "camelCase")]
#[graphql(input_name = "UsageDetailsInput")]
pub struct UsageDetails {
    // Session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_view_duration: Option<i64>,
    // Pagination: next, previous, first, last, page_size_change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_page: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_page: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_page_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_page_size: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<i32>,
    // Columns: show, hide, toggle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_column_state: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_column_state: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_columns: Option<Vec<String>>,
    // Search: search, clear, filter_change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_filters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_search_filters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_result_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_duration: Option<f64>,
    // Pointer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_position: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_position: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_on_page: Option<i64>,
    // Navigation: back, forward, reload, external_link, page_hidden, page_visible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_type: Option<String>,
    // Forms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_value: Option<String>,
    // Errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_stack: Option<String>,
}

/// User interaction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct AppUsage {
    pub id: i64,
    pub session_id: String,
    pub event_id: Option<i64>,
    pub action_type: String,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    #[serde(flatten)]
    #[graphql(flatten)]
    pub details: UsageDetails,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Input for `trackUsage` / `trackUsageBatch`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, InputObject)]
#[serde(rename_all = "camelCase")]
pub struct AppUsageInput {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    pub url: String,
    #[serde(flatten)]
    #[graphql(flatten)]
    pub details: UsageDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl AppEvent {
    /// Build a row from client input, deriving the user-agent facets.
    ///
    /// Geo fields are kept as the client sent them.
    pub fn from_input(input: AppEventInput, ip_address: String, now: DateTime<Utc>) -> Self {
        let agent = UserAgentInfo::parse(&input.user_agent);
        Self {
            id: 0,
            event_type: input.event_type,
            timestamp: input.timestamp.unwrap_or(now),
            url: input.url,
            domain: input.domain,
            referrer: input.referrer,
            user_agent: input.user_agent,
            language: input.language,
            screen_width: input.screen_width,
            screen_height: input.screen_height,
            viewport_width: input.viewport_width,
            viewport_height: input.viewport_height,
            ip_address,
            country: input.country,
            region: input.region,
            city: input.city,
            timezone: input.timezone,
            session_id: input.session_id,
            user_id: input.user_id,
            device_type: Some(agent.device_type.to_string()),
            browser: Some(agent.browser.to_string()),
            operating_system: Some(agent.operating_system.to_string()),
            is_bot: Some(agent.is_bot),
            metadata: input.metadata,
            created_at: now,
        }
    }
}

impl AppPerformance {
    pub fn from_input(input: AppPerformanceInput, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            session_id: input.session_id,
            event_id: input.event_id,
            metric_type: input.metric_type,
            timestamp: input.timestamp.unwrap_or(now),
            url: input.url,
            details: input.details,
            metadata: input.metadata,
            created_at: now,
        }
    }
}

impl AppUsage {
    pub fn from_input(input: AppUsageInput, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            session_id: input.session_id,
            event_id: input.event_id,
            action_type: input.action_type,
            timestamp: input.timestamp.unwrap_or(now),
            url: input.url,
            details: input.details,
            metadata: input.metadata,
            created_at: now,
        }
    }
}

/// Filters shared by the telemetry list queries
#[derive(Debug, Clone, Default)]
pub struct TelemetryFilter {
    pub limit: i64,
    pub offset: i64,
    pub session_id: Option<String>,
    /// Matches `eventType`, `metricType` or `actionType` depending on the table
    pub kind: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl TelemetryFilter {
    pub const DEFAULT_LIMIT: i64 = 100;

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.filter(|l| *l > 0).unwrap_or(Self::DEFAULT_LIMIT),
            offset: offset.unwrap_or(0).max(0),
            ..Default::default()
        }
    }
}
