//! `orders` query

use std::sync::Arc;

use async_graphql::{Context, Object};

use crate::order_store::{OrderPage, OrderStore, PageRequest};
use crate::search::{encode_cursor, SearchFilter};
use crate::types::{OrderConnection, OrderEdge, PageInfo};

#[derive(Default)]
pub struct OrdersQuery;

#[Object]
impl OrdersQuery {
    /// Paginated order listing with optional free-text search.
    ///
    /// `first` defaults to 10. `page` (1-based) wins over `after`. Without
    /// `searchFields` the search runs over every text field and `orderID`.
    async fn orders(
        &self,
        ctx: &Context<'_>,
        first: Option<i64>,
        after: Option<String>,
        page: Option<i64>,
        search: Option<String>,
        search_fields: Option<Vec<String>>,
    ) -> async_graphql::Result<OrderConnection> {
        let store = ctx.data::<Arc<OrderStore>>()?;

        let filter = SearchFilter::build(search.as_deref(), search_fields.as_deref())?;
        let request = PageRequest::from_args(first, page, after.as_deref())?;

        let page = store.find_page(&filter, &request);
        Ok(connection(page))
    }
}

fn connection(page: OrderPage) -> OrderConnection {
    let edges: Vec<OrderEdge> = page
        .orders
        .into_iter()
        .map(|order| OrderEdge {
            cursor: encode_cursor(order.id),
            node: order,
        })
        .collect();

    let page_info = PageInfo {
        end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        has_next_page: page.has_next_page,
        current_page: page.current_page as i64,
        total_pages: page.total_pages as i64,
    };

    OrderConnection {
        edges,
        page_info,
        total_count: page.total_count as i64,
    }
}
