//! Integration tests for the client-side analytics buffer and batcher

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use order_admin::analytics::{
    AnalyticsBatcher, AnalyticsBuffer, ClientContext, EventData, PerformanceData, Session,
    Transport, UsageData,
};
use order_admin::types::{AppEventInput, AppPerformanceInput, AppUsageInput, UsageDetails};
use order_admin::TransportError;

#[derive(Default)]
struct Recorded {
    event_batches: Vec<Vec<AppEventInput>>,
    performance: Vec<AppPerformanceInput>,
    usage: Vec<AppUsageInput>,
    fail_events: bool,
    /// Fail single sends once this many have been delivered
    fail_singles_after: Option<usize>,
}

/// Transport double that records what it is asked to send
#[derive(Clone, Default)]
struct RecordingTransport {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingTransport {
    fn failing_events() -> Self {
        let transport = Self::default();
        transport.recorded.lock().fail_events = true;
        transport
    }

    fn failing_singles_after(delivered: usize) -> Self {
        let transport = Self::default();
        transport.recorded.lock().fail_singles_after = Some(delivered);
        transport
    }
}

impl Transport for RecordingTransport {
    async fn send_events(&self, events: &[AppEventInput]) -> Result<(), TransportError> {
        let mut recorded = self.recorded.lock();
        if recorded.fail_events {
            return Err(TransportError::Status(503));
        }
        recorded.event_batches.push(events.to_vec());
        Ok(())
    }

    async fn send_performance(&self, entry: &AppPerformanceInput) -> Result<(), TransportError> {
        let mut recorded = self.recorded.lock();
        if recorded.fail_singles_after == Some(recorded.performance.len()) {
            return Err(TransportError::GraphQl("metricType must not be empty".to_string()));
        }
        recorded.performance.push(entry.clone());
        Ok(())
    }

    async fn send_usage(&self, entry: &AppUsageInput) -> Result<(), TransportError> {
        let mut recorded = self.recorded.lock();
        if recorded.fail_singles_after == Some(recorded.usage.len()) {
            return Err(TransportError::Status(500));
        }
        recorded.usage.push(entry.clone());
        Ok(())
    }
}

fn context() -> ClientContext {
    ClientContext {
        url: "http://localhost:5173/orders".to_string(),
        domain: "localhost".to_string(),
        user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0".to_string(),
        screen_width: 1920,
        screen_height: 1080,
        viewport_width: 1280,
        viewport_height: 720,
        ..Default::default()
    }
}

fn buffer(transport: RecordingTransport) -> AnalyticsBuffer<RecordingTransport> {
    AnalyticsBuffer::new(transport, Session::new("session_1_abc"), context())
}

fn click(n: usize) -> EventData {
    let mut event = EventData::new("click");
    event.metadata = Some(serde_json::json!({ "n": n }));
    event
}

fn event_numbers(events: &[AppEventInput]) -> Vec<u64> {
    events
        .iter()
        .map(|e| e.metadata.as_ref().unwrap()["n"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_events_are_stamped_with_session_and_context() {
    let transport = RecordingTransport::default();
    let mut buffer = buffer(transport);

    buffer.track_event(EventData::new("visit")).await.unwrap();
    let event = &buffer.pending_events()[0];
    assert_eq!(event.session_id, "session_1_abc");
    assert_eq!(event.url, "http://localhost:5173/orders");
    assert_eq!(event.viewport_width, 1280);
    assert!(event.timestamp.is_some());
}

#[tokio::test]
async fn test_event_queue_flushes_at_batch_size() {
    let transport = RecordingTransport::default();
    let mut buffer = buffer(transport.clone());

    for n in 0..9 {
        buffer.track_event(click(n)).await.unwrap();
    }
    assert!(transport.recorded.lock().event_batches.is_empty());

    buffer.track_event(click(9)).await.unwrap();
    let recorded = transport.recorded.lock();
    assert_eq!(recorded.event_batches.len(), 1);
    assert_eq!(event_numbers(&recorded.event_batches[0]), (0..10).collect::<Vec<_>>());
    assert!(buffer.pending_events().is_empty());
}

#[tokio::test]
async fn test_failed_event_batch_is_requeued_at_head() {
    let transport = RecordingTransport::failing_events();
    let mut buffer = buffer(transport.clone());

    for n in 0..3 {
        buffer.track_event(click(n)).await.unwrap();
    }
    assert!(buffer.flush_events().await.is_err());
    assert_eq!(event_numbers(buffer.pending_events()), vec![0, 1, 2]);

    buffer.track_event(click(3)).await.unwrap();
    assert_eq!(event_numbers(buffer.pending_events()), vec![0, 1, 2, 3]);

    transport.recorded.lock().fail_events = false;
    buffer.flush().await.unwrap();
    let recorded = transport.recorded.lock();
    assert_eq!(event_numbers(&recorded.event_batches[0]), vec![0, 1, 2, 3]);
    assert!(buffer.pending_events().is_empty());
}

#[tokio::test]
async fn test_failed_performance_flush_drops_the_rest() {
    let transport = RecordingTransport::failing_singles_after(1);
    let mut buffer = buffer(transport.clone());

    for name in ["A", "B", "C"] {
        buffer
            .track_graphql_query(name, 12.0, Some(100), None)
            .await;
    }
    let delivered = buffer.flush_performance().await;

    assert_eq!(delivered, 1);
    assert!(buffer.pending_performance().is_empty());
    let recorded = transport.recorded.lock();
    assert_eq!(recorded.performance.len(), 1);
    assert_eq!(recorded.performance[0].metric_type, "graphql_query");
    assert_eq!(recorded.performance[0].details.graphql_query_name.as_deref(), Some("A"));
}

#[tokio::test]
async fn test_failed_usage_flush_empties_queue() {
    let transport = RecordingTransport::failing_singles_after(0);
    let mut buffer = buffer(transport.clone());

    buffer
        .track_usage(UsageData {
            action_type: "search".to_string(),
            details: UsageDetails {
                search_query: Some("civic".to_string()),
                ..Default::default()
            },
            ..Default::default()
        })
        .await;
    buffer.track_visibility(true).await;

    assert_eq!(buffer.flush_usage().await, 0);
    assert!(buffer.pending_usage().is_empty());
    assert!(transport.recorded.lock().usage.is_empty());
}

#[tokio::test]
async fn test_usage_carries_session_clocks() {
    let transport = RecordingTransport::default();
    let mut buffer = buffer(transport);
    let started = buffer.session().started_at();

    buffer.track_visibility(true).await;
    buffer.track_visibility(false).await;

    let usage = buffer.pending_usage();
    assert_eq!(usage.len(), 2);
    assert!(usage.iter().all(|u| u.action_type == "navigation"));
    assert!(usage.iter().all(|u| u.details.session_start_time == Some(started)));
    assert!(usage.iter().all(|u| u.details.page_view_duration.is_some()));

    assert_eq!(usage[0].details.navigation_action.as_deref(), Some("page_hidden"));
    assert!(usage[0].details.time_spent_on_page.is_some());
    assert_eq!(usage[1].details.navigation_action.as_deref(), Some("page_visible"));
    assert!(usage[1].details.time_spent_on_page.is_none());
}

#[tokio::test]
async fn test_page_view_queues_visit() {
    let transport = RecordingTransport::default();
    let mut buffer = buffer(transport);
    let before = buffer.session().page_view_started_at();

    tokio::time::sleep(Duration::from_millis(5)).await;
    buffer.track_page_view().await.unwrap();

    assert!(buffer.session().page_view_started_at() > before);
    let visit = &buffer.pending_events()[0];
    assert_eq!(visit.event_type, "visit");
    assert!(visit.metadata.as_ref().unwrap()["timestamp"].is_string());
}

#[tokio::test]
async fn test_batcher_flushes_on_shutdown() {
    let transport = RecordingTransport::default();
    let batcher = AnalyticsBatcher::new(buffer(transport.clone()), Duration::from_secs(3600));
    let (handle, task) = batcher.spawn();

    handle.track_event(click(0)).await;
    handle
        .track_performance(PerformanceData {
            metric_type: "page_load".to_string(),
            ..Default::default()
        })
        .await;
    handle.track_visibility(true).await;
    handle.shutdown().await;

    let buffer = task.await.unwrap();
    assert!(buffer.pending_events().is_empty());

    let recorded = transport.recorded.lock();
    assert_eq!(recorded.event_batches.len(), 1);
    assert_eq!(recorded.performance.len(), 1);
    assert_eq!(recorded.usage.len(), 1);

    // Commands after shutdown are dropped without panicking
    drop(recorded);
    handle.track_event(click(1)).await;
}

#[tokio::test]
async fn test_batcher_flushes_on_timer() {
    let transport = RecordingTransport::default();
    let batcher = AnalyticsBatcher::new(buffer(transport.clone()), Duration::from_millis(20));
    let (handle, task) = batcher.spawn();

    handle.track_event(click(0)).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(transport.recorded.lock().event_batches.len(), 1);

    drop(handle);
    let buffer = task.await.unwrap();
    assert!(buffer.pending_events().is_empty());
}

#[tokio::test]
async fn test_batcher_keeps_undelivered_events() {
    let transport = RecordingTransport::failing_events();
    let batcher = AnalyticsBatcher::new(buffer(transport), Duration::from_secs(3600));
    let (handle, task) = batcher.spawn();

    handle.track_event(click(0)).await;
    handle.track_event(click(1)).await;
    handle.flush().await;
    handle.shutdown().await;

    let buffer = task.await.unwrap();
    assert_eq!(event_numbers(buffer.pending_events()), vec![0, 1]);
}
