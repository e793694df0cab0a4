//! Relay-style connection types returned by the `orders` query

use async_graphql::SimpleObject;

use super::Order;

/// One order plus the cursor that resumes after it
#[derive(Debug, Clone, SimpleObject)]
pub struct OrderEdge {
    pub node: Order,
    pub cursor: String,
}

/// Pagination state for an `OrderConnection`
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct PageInfo {
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub current_page: i64,
    pub total_pages: i64,
}

/// Page of orders with the total number of matches
#[derive(Debug, Clone, SimpleObject)]
pub struct OrderConnection {
    pub edges: Vec<OrderEdge>,
    pub page_info: PageInfo,
    pub total_count: i64,
}

impl OrderConnection {
    /// Convenience accessor over the edge nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Order> {
        self.edges.iter().map(|edge| &edge.node)
    }
}
