//! API module for the HTTP and GraphQL endpoints
//!
//! This module serves the GraphQL schema used by the order admin UI and its
//! analytics client.

pub mod extractors;
pub mod graphql;
pub mod http;

pub use graphql::{build_schema, AdminSchema};
pub use http::{create_router, AppState};
