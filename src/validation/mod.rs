//! Telemetry validation
//!
//! Rows are checked against the column widths of the analytics schema
//! before anything is written, so a batch with one bad row is rejected whole.

mod rules;

pub use rules::{validate_event, validate_performance, validate_usage};
