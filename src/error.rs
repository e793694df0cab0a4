//! Error types shared across the stores, the query layer and the analytics client

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the order and telemetry stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Errors in the arguments of the `orders` query
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("unknown search field '{0}'")]
    UnknownSearchField(String),

    #[error("page size must be positive, got {0}")]
    InvalidPageSize(i64),
}

/// Telemetry input rejected before it reaches the database
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} exceeds {max} characters ({actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Failure to deliver a telemetry batch
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("GraphQL error: {0}")]
    GraphQl(String),
}
