//! Utility functions and helpers
//!
//! Atomic file rewrites, timestamp conversions and user-agent classification.

pub mod atomic;
pub mod time;
pub mod user_agent;

pub use atomic::atomic_write;
pub use time::{current_timestamp_millis, from_millis, millis_since};
pub use user_agent::UserAgentInfo;
