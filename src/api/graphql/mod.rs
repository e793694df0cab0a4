//! GraphQL schema
//!
//! The query root merges the `orders` listing with the telemetry read
//! queries; the mutation root holds the `track*` mutations. Both stores are
//! attached as schema data, and the caller's IP is attached per request.

mod orders;
mod telemetry;

use std::sync::Arc;

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::order_store::OrderStore;
use crate::telemetry_store::TelemetryStore;

pub use orders::OrdersQuery;
pub use telemetry::{TelemetryMutation, TelemetryQuery};

#[derive(MergedObject, Default)]
pub struct QueryRoot(OrdersQuery, TelemetryQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(TelemetryMutation);

pub type AdminSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema over the two stores
pub fn build_schema(orders: Arc<OrderStore>, telemetry: TelemetryStore) -> AdminSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(orders)
        .data(telemetry)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sdl_exposes_operations() {
        let sdl = build_schema(Arc::new(OrderStore::in_memory()), unconnected_store()).sdl();

        for name in [
            "orders(",
            "appEvents(",
            "appPerformance(",
            "appUsage(",
            "trackEvent(",
            "trackEventsBatch(",
            "trackPerformanceBatch(",
            "trackUsageBatch(",
            "searchFields:",
            "orderID:",
            "performanceMetrics:",
        ] {
            assert!(sdl.contains(name), "missing {name} in schema");
        }
    }

    fn unconnected_store() -> TelemetryStore {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .connect_lazy("sqlite::memory:")
            .unwrap();
        TelemetryStore::with_pool(pool)
    }
}
