//! Data types for the order admin service
//!
//! This module contains the order documents, the telemetry records and the
//! pagination envelopes shared by the stores and the GraphQL layer.

mod connection;
mod order;
mod telemetry;

pub use connection::{OrderConnection, OrderEdge, PageInfo};
pub use order::{Order, OrderStatus, PaymentMethod};
pub use telemetry::{
    AppEvent, AppEventInput, AppPerformance, AppPerformanceInput, AppUsage, AppUsageInput,
    PerformanceDetails, TelemetryFilter, UsageDetails,
};

#[cfg(test)]
pub(crate) use order::sample_order;
