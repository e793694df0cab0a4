//! Integration tests for the telemetry mutations and queries

use std::net::IpAddr;
use std::sync::Arc;

use async_graphql::{Request, Variables};
use serde_json::{json, Value};

use order_admin::api::extractors::ClientIp;
use order_admin::api::{build_schema, AdminSchema};
use order_admin::{OrderStore, TelemetryStore};

const FIREFOX_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";

async fn setup() -> (AdminSchema, TelemetryStore) {
    let telemetry = TelemetryStore::connect("sqlite::memory:", 1).await.unwrap();
    let schema = build_schema(Arc::new(OrderStore::in_memory()), telemetry.clone());
    (schema, telemetry)
}

async fn execute(schema: &AdminSchema, query: &str, variables: Value) -> Result<Value, Vec<String>> {
    let ip: IpAddr = "198.51.100.23".parse().unwrap();
    let request = Request::new(query)
        .variables(Variables::from_json(variables))
        .data(ClientIp(ip));
    let response = schema.execute(request).await;
    if response.errors.is_empty() {
        Ok(response.data.into_json().unwrap())
    } else {
        Err(response.errors.into_iter().map(|e| e.message).collect())
    }
}

fn event_input(session_id: &str, event_type: &str) -> Value {
    json!({
        "eventType": event_type,
        "url": "http://localhost:5173/orders",
        "domain": "localhost",
        "userAgent": FIREFOX_UA,
        "language": "en-US",
        "screenWidth": 1920,
        "screenHeight": 1080,
        "viewportWidth": 1440,
        "viewportHeight": 900,
        "sessionId": session_id,
        "city": "Phoenix",
        "metadata": { "source": "test" }
    })
}

const TRACK_EVENT: &str = r#"
mutation Track($input: AppEventInput!) {
  trackEvent(input: $input) {
    id eventType timestamp ipAddress deviceType browser operatingSystem isBot city metadata
  }
}
"#;

const TRACK_EVENTS_BATCH: &str = r#"
mutation Batch($events: [AppEventInput!]!) {
  trackEventsBatch(events: $events) { id sessionId }
}
"#;

const APP_EVENTS: &str = r#"
query Events($sessionId: String, $eventType: String, $limit: Int, $offset: Int) {
  appEvents(sessionId: $sessionId, eventType: $eventType, limit: $limit, offset: $offset) {
    id eventType sessionId
  }
}
"#;

#[tokio::test]
async fn test_track_event_enriches_from_request() {
    let (schema, _) = setup().await;
    let data = execute(&schema, TRACK_EVENT, json!({ "input": event_input("s1", "visit") }))
        .await
        .unwrap();

    let event = &data["trackEvent"];
    assert_eq!(event["id"], 1);
    assert_eq!(event["ipAddress"], "198.51.100.23");
    assert_eq!(event["deviceType"], "desktop");
    assert_eq!(event["browser"], "Firefox");
    assert_eq!(event["operatingSystem"], "Windows");
    assert_eq!(event["isBot"], false);
    assert_eq!(event["city"], "Phoenix");
    assert_eq!(event["metadata"], json!({ "source": "test" }));
    assert!(event["timestamp"].is_string());
}

#[tokio::test]
async fn test_explicit_timestamp_is_kept() {
    let (schema, _) = setup().await;
    let mut input = event_input("s1", "visit");
    input["timestamp"] = json!("2024-03-01T12:00:00Z");

    let data = execute(&schema, TRACK_EVENT, json!({ "input": input })).await.unwrap();
    let timestamp = data["trackEvent"]["timestamp"].as_str().unwrap();
    assert!(timestamp.starts_with("2024-03-01T12:00:00"));
}

#[tokio::test]
async fn test_batch_is_all_or_nothing() {
    let (schema, telemetry) = setup().await;

    let data = execute(
        &schema,
        TRACK_EVENTS_BATCH,
        json!({ "events": [event_input("s1", "visit"), event_input("s1", "click")] }),
    )
    .await
    .unwrap();
    assert_eq!(data["trackEventsBatch"].as_array().unwrap().len(), 2);

    let mut too_long = event_input("s1", "visit");
    too_long["language"] = json!("en-US-x-verylong");
    let errors = execute(
        &schema,
        TRACK_EVENTS_BATCH,
        json!({ "events": [event_input("s1", "scroll"), too_long] }),
    )
    .await
    .unwrap_err();
    assert!(errors[0].contains("language"));

    let stored = telemetry
        .list_events(&order_admin::types::TelemetryFilter::new(None, None))
        .await
        .unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|e| e.event_type != "scroll"));
}

#[tokio::test]
async fn test_app_events_filters() {
    let (schema, _) = setup().await;
    execute(
        &schema,
        TRACK_EVENTS_BATCH,
        json!({ "events": [
            event_input("s1", "visit"),
            event_input("s1", "click"),
            event_input("s2", "visit"),
            event_input("s1", "visit"),
        ] }),
    )
    .await
    .unwrap();

    let data = execute(&schema, APP_EVENTS, json!({ "sessionId": "s1", "eventType": "visit" }))
        .await
        .unwrap();
    let events = data["appEvents"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e["sessionId"] == "s1" && e["eventType"] == "visit"));

    let data = execute(&schema, APP_EVENTS, json!({ "limit": 2, "offset": 3 })).await.unwrap();
    assert_eq!(data["appEvents"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_performance_details_are_flat_fields() {
    let (schema, _) = setup().await;

    let data = execute(
        &schema,
        r#"mutation Perf($input: AppPerformanceInput!) {
            trackPerformance(input: $input) { id metricType graphqlQueryName graphqlResponseTime eventId }
        }"#,
        json!({ "input": {
            "sessionId": "s1",
            "eventId": 424242,
            "metricType": "graphql_query",
            "url": "http://localhost:5173/orders",
            "graphqlQueryName": "GetOrders",
            "graphqlResponseTime": 87.5
        } }),
    )
    .await
    .unwrap();
    assert_eq!(data["trackPerformance"]["graphqlQueryName"], "GetOrders");
    assert_eq!(data["trackPerformance"]["eventId"], 424242);

    let data = execute(
        &schema,
        r#"{ appPerformance(metricType: "graphql_query") { graphqlResponseTime pageLoadTime } }"#,
        json!({}),
    )
    .await
    .unwrap();
    assert_eq!(data["appPerformance"][0]["graphqlResponseTime"], 87.5);
    assert!(data["appPerformance"][0]["pageLoadTime"].is_null());
}

#[tokio::test]
async fn test_usage_url_limit() {
    let (schema, _) = setup().await;
    let errors = execute(
        &schema,
        r#"mutation Usage($input: AppUsageInput!) { trackUsage(input: $input) { id } }"#,
        json!({ "input": {
            "sessionId": "s1",
            "actionType": "click",
            "url": format!("http://localhost/{}", "x".repeat(600))
        } }),
    )
    .await
    .unwrap_err();
    assert!(errors[0].contains("url"));
}

#[tokio::test]
async fn test_event_resolves_linked_metrics() {
    let (schema, _) = setup().await;
    let data = execute(&schema, TRACK_EVENT, json!({ "input": event_input("s1", "visit") }))
        .await
        .unwrap();
    let event_id = data["trackEvent"]["id"].as_i64().unwrap();

    execute(
        &schema,
        r#"mutation Usage($usage: [AppUsageInput!]!) { trackUsageBatch(usage: $usage) { id } }"#,
        json!({ "usage": [
            {
                "sessionId": "s1",
                "eventId": event_id,
                "actionType": "pagination",
                "url": "http://localhost:5173/orders",
                "paginationAction": "next",
                "previousPage": 1,
                "newPage": 2
            },
            {
                "sessionId": "s1",
                "actionType": "search",
                "url": "http://localhost:5173/orders",
                "searchQuery": "civic"
            }
        ] }),
    )
    .await
    .unwrap();

    let data = execute(
        &schema,
        r#"{ appEvents { id usageMetrics { actionType paginationAction newPage } performanceMetrics { id } } }"#,
        json!({}),
    )
    .await
    .unwrap();

    let event = &data["appEvents"][0];
    assert_eq!(event["id"], event_id);
    let usage = event["usageMetrics"].as_array().unwrap();
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0]["paginationAction"], "next");
    assert_eq!(usage[0]["newPage"], 2);
    assert!(event["performanceMetrics"].as_array().unwrap().is_empty());
}
