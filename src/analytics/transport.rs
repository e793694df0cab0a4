//! Delivery of queued telemetry to the GraphQL endpoint

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::TransportError;
use crate::types::{AppEventInput, AppPerformanceInput, AppUsageInput};

const TRACK_EVENTS_BATCH: &str = "mutation TrackEventsBatch($events: [AppEventInput!]!) {
  trackEventsBatch(events: $events) { id timestamp }
}";

const TRACK_PERFORMANCE: &str = "mutation TrackPerformance($input: AppPerformanceInput!) {
  trackPerformance(input: $input) { id timestamp }
}";

const TRACK_USAGE: &str = "mutation TrackUsage($input: AppUsageInput!) {
  trackUsage(input: $input) { id timestamp }
}";

/// Sends telemetry somewhere. Implemented over HTTP by [`GraphqlTransport`]
/// and by recording doubles in tests.
pub trait Transport: Send + Sync {
    /// Send a batch of events in one request
    fn send_events(
        &self,
        events: &[AppEventInput],
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn send_performance(
        &self,
        entry: &AppPerformanceInput,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn send_usage(
        &self,
        entry: &AppUsageInput,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorBody {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponseBody {
    #[serde(default)]
    errors: Vec<GraphqlErrorBody>,
}

/// [`Transport`] that posts the `track*` mutations with reqwest
#[derive(Debug, Clone)]
pub struct GraphqlTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl GraphqlTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute(&self, query: &str, variables: Value) -> Result<(), TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body: GraphqlResponseBody = response.json().await?;
        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(TransportError::GraphQl(messages.join("; ")));
        }
        Ok(())
    }
}

impl Transport for GraphqlTransport {
    async fn send_events(&self, events: &[AppEventInput]) -> Result<(), TransportError> {
        self.execute(TRACK_EVENTS_BATCH, json!({ "events": events })).await
    }

    async fn send_performance(&self, entry: &AppPerformanceInput) -> Result<(), TransportError> {
        self.execute(TRACK_PERFORMANCE, json!({ "input": entry })).await
    }

    async fn send_usage(&self, entry: &AppUsageInput) -> Result<(), TransportError> {
        self.execute(TRACK_USAGE, json!({ "input": entry })).await
    }
}
