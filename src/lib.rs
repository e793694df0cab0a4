//! Order Admin API
//!
//! Backend for an order management admin tool: a GraphQL API with a
//! paginated, searchable `orders` listing over a document store, plus
//! telemetry capture (events, performance measurements, usage interactions)
//! into a relational analytics store, and the client-side analytics buffer
//! that feeds it.
//!
//! # Features
//!
//! - **Search**: case-insensitive substring match over text fields, exact
//!   match over numeric fields, ORed together
//! - **Pagination**: page numbers or opaque forward cursors, with total counts
//! - **Telemetry**: atomic batch inserts with user-agent enrichment
//! - **Client Buffer**: batched delivery with timer and shutdown flushing
//!
//! # Modules
//!
//! - `types`: Order documents, telemetry records, connection envelopes
//! - `order_store`: JSON-lines document store with in-memory reads
//! - `search`: Filter construction and pagination cursors
//! - `telemetry_store`: SQLite-backed analytics tables
//! - `validation`: Column width checks for telemetry rows
//! - `api`: Axum router and GraphQL schema
//! - `analytics`: Client-side buffer, batcher and transport
//! - `config`: Environment configuration
//! - `seed`: Synthetic order generation
//! - `utils`: Timestamps and user-agent parsing
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use order_admin::api::{build_schema, create_router, AppState};
//! use order_admin::{OrderStore, TelemetryStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let orders = Arc::new(OrderStore::open("orders.jsonl")?);
//! let telemetry = TelemetryStore::connect("sqlite::memory:", 1).await?;
//! let app = create_router(AppState::new(build_schema(orders, telemetry), true));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:4447").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod order_store;
pub mod search;
pub mod seed;
pub mod telemetry_store;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export commonly used items at crate root
pub use error::{QueryError, StoreError, StoreResult, TransportError, ValidationError};
pub use order_store::{OrderPage, OrderStore, PageRequest};
pub use search::{SearchField, SearchFilter};
pub use telemetry_store::TelemetryStore;
pub use types::{
    AppEvent, AppEventInput, AppPerformance, AppPerformanceInput, AppUsage, AppUsageInput, Order,
    OrderConnection, OrderStatus, PaymentMethod,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
