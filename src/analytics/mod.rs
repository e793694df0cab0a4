//! Analytics client
//!
//! Buffers events, performance measurements and usage interactions on the
//! client side and ships them to the `track*` mutations. A background
//! [`AnalyticsBatcher`] owns the [`AnalyticsBuffer`] and flushes it on a
//! timer, when a queue fills up, and one final time on shutdown.
//!
//! ```no_run
//! use order_admin::analytics::{self, AnalyticsConfig, ClientContext, EventData};
//!
//! # async fn demo() -> Result<(), order_admin::error::TransportError> {
//! let (handle, task) = analytics::start(AnalyticsConfig::default(), ClientContext::default())?;
//! handle.track_page_view().await;
//! handle.track_event(EventData::new("export_clicked")).await;
//! handle.shutdown().await;
//! let _ = task.await;
//! # Ok(())
//! # }
//! ```

mod batcher;
mod buffer;
mod session;
mod transport;

use std::path::PathBuf;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::TransportError;

pub use batcher::{AnalyticsBatcher, AnalyticsCommand, AnalyticsHandle};
pub use buffer::{AnalyticsBuffer, ClientContext, EventData, PerformanceData, UsageData};
pub use session::{generate_session_id, Session};
pub use transport::{GraphqlTransport, Transport};

/// Analytics client settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// GraphQL endpoint receiving the `track*` mutations
    pub endpoint: String,
    pub batch_size: usize,
    pub flush_interval: Duration,
    /// File holding the session id between runs
    pub session_file: PathBuf,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4447/graphql".to_string(),
            batch_size: 10,
            flush_interval: Duration::from_secs(30),
            session_file: PathBuf::from(".analytics_session"),
        }
    }
}

/// Start a batcher that posts to `config.endpoint`
pub fn start(
    config: AnalyticsConfig,
    context: ClientContext,
) -> Result<(AnalyticsHandle, JoinHandle<AnalyticsBuffer<GraphqlTransport>>), TransportError> {
    let transport = GraphqlTransport::new(config.endpoint.as_str())?;
    let session = Session::load_or_create(&config.session_file);
    tracing::info!(session = %session.id(), endpoint = %config.endpoint, "analytics started");

    let buffer = AnalyticsBuffer::with_batch_size(transport, session, context, config.batch_size);
    Ok(AnalyticsBatcher::new(buffer, config.flush_interval).spawn())
}
