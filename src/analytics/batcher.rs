//! Background flushing for the analytics buffer

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::buffer::{AnalyticsBuffer, EventData, PerformanceData, UsageData};
use super::transport::Transport;

/// Work sent from an [`AnalyticsHandle`] to the batcher task
#[derive(Debug)]
pub enum AnalyticsCommand {
    Event(EventData),
    Performance(PerformanceData),
    Usage(UsageData),
    PageView,
    Visibility { hidden: bool },
    Flush,
    /// Final flush, then stop (page unload)
    Shutdown,
}

/// Owns the buffer and flushes it on a timer
pub struct AnalyticsBatcher<T: Transport> {
    buffer: AnalyticsBuffer<T>,
    flush_interval: Duration,
}

impl<T: Transport + 'static> AnalyticsBatcher<T> {
    pub fn new(buffer: AnalyticsBuffer<T>, flush_interval: Duration) -> Self {
        Self {
            buffer,
            flush_interval,
        }
    }

    async fn apply(&mut self, command: AnalyticsCommand) {
        let result = match command {
            AnalyticsCommand::Event(data) => self.buffer.track_event(data).await,
            AnalyticsCommand::Performance(data) => {
                self.buffer.track_performance(data).await;
                Ok(())
            }
            AnalyticsCommand::Usage(data) => {
                self.buffer.track_usage(data).await;
                Ok(())
            }
            AnalyticsCommand::PageView => self.buffer.track_page_view().await,
            AnalyticsCommand::Visibility { hidden } => {
                self.buffer.track_visibility(hidden).await;
                Ok(())
            }
            AnalyticsCommand::Flush | AnalyticsCommand::Shutdown => self.buffer.flush().await,
        };

        // Failed event batches stay queued for the next flush
        if let Err(e) = result {
            tracing::debug!(error = %e, "analytics delivery deferred");
        }
    }

    /// Run until `Shutdown` or until every handle is dropped, then hand the
    /// buffer back with whatever could not be delivered.
    pub async fn run(mut self, mut rx: mpsc::Receiver<AnalyticsCommand>) -> AnalyticsBuffer<T> {
        let mut timer = interval_at(Instant::now() + self.flush_interval, self.flush_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = timer.tick() => {
                    self.apply(AnalyticsCommand::Flush).await;
                }

                command = rx.recv() => {
                    match command {
                        Some(AnalyticsCommand::Shutdown) | None => {
                            self.apply(AnalyticsCommand::Shutdown).await;
                            break;
                        }
                        Some(command) => self.apply(command).await,
                    }
                }
            }
        }

        tracing::info!(
            pending_events = self.buffer.pending_events().len(),
            "analytics batcher stopped"
        );
        self.buffer
    }

    /// Spawn the batcher and return a handle to feed it
    pub fn spawn(self) -> (AnalyticsHandle, JoinHandle<AnalyticsBuffer<T>>) {
        let (tx, rx) = mpsc::channel(256);
        let task = tokio::spawn(self.run(rx));
        (AnalyticsHandle { tx }, task)
    }
}

/// Cloneable entry point to a running batcher. Never fails: a batcher that
/// has already stopped is logged and ignored.
#[derive(Debug, Clone)]
pub struct AnalyticsHandle {
    tx: mpsc::Sender<AnalyticsCommand>,
}

impl AnalyticsHandle {
    async fn send(&self, command: AnalyticsCommand) {
        if self.tx.send(command).await.is_err() {
            tracing::warn!("analytics batcher is gone, dropping command");
        }
    }

    pub async fn track_event(&self, data: EventData) {
        self.send(AnalyticsCommand::Event(data)).await;
    }

    pub async fn track_performance(&self, data: PerformanceData) {
        self.send(AnalyticsCommand::Performance(data)).await;
    }

    pub async fn track_usage(&self, data: UsageData) {
        self.send(AnalyticsCommand::Usage(data)).await;
    }

    pub async fn track_page_view(&self) {
        self.send(AnalyticsCommand::PageView).await;
    }

    pub async fn track_visibility(&self, hidden: bool) {
        self.send(AnalyticsCommand::Visibility { hidden }).await;
    }

    pub async fn flush(&self) {
        self.send(AnalyticsCommand::Flush).await;
    }

    /// Ask for a final flush and stop the batcher
    pub async fn shutdown(&self) {
        self.send(AnalyticsCommand::Shutdown).await;
    }
}
