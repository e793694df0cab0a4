//! Time and timestamp utilities

use chrono::{DateTime, Utc};

/// Current Unix timestamp in milliseconds
pub fn current_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert stored epoch milliseconds back into a UTC timestamp
pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Milliseconds elapsed since `start`, never negative
pub fn millis_since(start: DateTime<Utc>) -> i64 {
    (Utc::now() - start).num_milliseconds().max(0)
}
