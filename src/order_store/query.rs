//! Read path for the order store: filtered, paginated listing
//!
//! Matching runs over the whole collection (in parallel for large stores),
//! which gives the total count for free; the page is then sliced out of the
//! id-ordered matches either by page number or after a cursor.

use rayon::prelude::*;

use crate::error::QueryError;
use crate::search::{decode_cursor, SearchFilter};
use crate::types::Order;

use super::OrderStore;

/// Threshold for using parallel filtering (order count)
const PARALLEL_SEARCH_THRESHOLD: usize = 1000;

/// How a page of results is addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// 1-based page number
    Page { size: usize, number: usize },
    /// Forward-only: records with an id greater than `after`
    After { size: usize, after: u64 },
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const MAX_PAGE_SIZE: usize = 1000;

    /// Resolve the `first` / `page` / `after` query arguments.
    ///
    /// A page number wins over a cursor. `first` of zero or null falls back to
    /// the default size; larger values are capped.
    pub fn from_args(
        first: Option<i64>,
        page: Option<i64>,
        after: Option<&str>,
    ) -> Result<Self, QueryError> {
        let size = match first {
            None | Some(0) => Self::DEFAULT_PAGE_SIZE,
            Some(n) if n < 0 => return Err(QueryError::InvalidPageSize(n)),
            Some(n) => usize::try_from(n)
                .unwrap_or(Self::MAX_PAGE_SIZE)
                .min(Self::MAX_PAGE_SIZE),
        };

        match (page, after) {
            (None, Some(cursor)) => Ok(PageRequest::After {
                size,
                after: decode_cursor(cursor)?,
            }),
            (page, _) => {
                let number = usize::try_from(page.unwrap_or(1).max(1)).unwrap_or(1);
                Ok(PageRequest::Page { size, number })
            }
        }
    }

    pub fn size(&self) -> usize {
        match self {
            PageRequest::Page { size, .. } | PageRequest::After { size, .. } => *size,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::Page {
            size: Self::DEFAULT_PAGE_SIZE,
            number: 1,
        }
    }
}

/// One page of matching orders plus pagination bookkeeping
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
}

/// Collect references to every matching order, in id order
fn matching<'a>(orders: &'a [Order], filter: &SearchFilter) -> Vec<&'a Order> {
    if orders.len() > PARALLEL_SEARCH_THRESHOLD {
        orders.par_iter().filter(|o| filter.matches(o)).collect()
    } else {
        orders.iter().filter(|o| filter.matches(o)).collect()
    }
}

/// Count orders matching the filter, ignoring pagination
pub fn count(store: &OrderStore, filter: &SearchFilter) -> usize {
    let orders = store.orders.read();
    if let SearchFilter::All = filter {
        return orders.len();
    }
    matching(&orders, filter).len()
}

/// Fetch one page of orders matching the filter
pub fn find_page(store: &OrderStore, filter: &SearchFilter, request: &PageRequest) -> OrderPage {
    let orders = store.orders.read();
    let matches = matching(&orders, filter);

    let total_count = matches.len();
    let size = request.size();
    let total_pages = total_count.div_ceil(size);

    let (start, current_page) = match *request {
        PageRequest::Page { number, .. } => (number.saturating_sub(1).saturating_mul(size), number),
        PageRequest::After { after, .. } => {
            let position = matches.partition_point(|o| o.id <= after);
            (position, position / size + 1)
        }
    };

    let page: Vec<Order> = matches
        .iter()
        .skip(start)
        .take(size)
        .map(|o| (*o).clone())
        .collect();

    let has_next_page = match request {
        PageRequest::Page { .. } => current_page < total_pages,
        PageRequest::After { .. } => start.saturating_add(size) < total_count,
    };

    tracing::debug!(
        filter = %filter.to_document(),
        total_count,
        current_page,
        returned = page.len(),
        "orders query"
    );

    OrderPage {
        orders: page,
        total_count,
        current_page,
        total_pages,
        has_next_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::encode_cursor;
    use crate::types::sample_order;

    fn store_with(count: i64) -> OrderStore {
        let store = OrderStore::in_memory();
        store
            .insert_many((1..=count).map(sample_order).collect())
            .unwrap();
        store
    }

    #[test]
    fn test_page_args_defaults_and_clamping() {
        assert_eq!(PageRequest::from_args(None, None, None).unwrap(), PageRequest::default());
        assert_eq!(
            PageRequest::from_args(Some(0), Some(-4), None).unwrap(),
            PageRequest::Page { size: 10, number: 1 }
        );
        assert_eq!(
            PageRequest::from_args(Some(5000), Some(3), None).unwrap(),
            PageRequest::Page { size: 1000, number: 3 }
        );
        assert_eq!(
            PageRequest::from_args(Some(-1), None, None),
            Err(QueryError::InvalidPageSize(-1))
        );
    }

    #[test]
    fn test_page_number_takes_precedence_over_cursor() {
        let cursor = encode_cursor(3);
        assert_eq!(
            PageRequest::from_args(Some(2), Some(2), Some(&cursor)).unwrap(),
            PageRequest::Page { size: 2, number: 2 }
        );
        assert_eq!(
            PageRequest::from_args(Some(2), None, Some(&cursor)).unwrap(),
            PageRequest::After { size: 2, after: 3 }
        );
    }

    #[test]
    fn test_has_next_page_by_page_number() {
        let store = store_with(25);
        let filter = SearchFilter::All;

        let page = find_page(&store, &filter, &PageRequest::Page { size: 10, number: 2 });
        assert_eq!(page.orders.len(), 10);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next_page);

        let page = find_page(&store, &filter, &PageRequest::Page { size: 10, number: 3 });
        assert_eq!(page.orders.len(), 5);
        assert!(!page.has_next_page);

        let page = find_page(&store, &filter, &PageRequest::Page { size: 10, number: 9 });
        assert!(page.orders.is_empty());
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_exact_multiple_has_no_extra_page() {
        let store = store_with(20);
        let page = find_page(&store, &SearchFilter::All, &PageRequest::Page { size: 10, number: 2 });
        assert_eq!(page.total_pages, 2);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_cursor_resumes_after_id() {
        let store = store_with(7);
        let page = find_page(&store, &SearchFilter::All, &PageRequest::After { size: 3, after: 3 });
        let ids: Vec<u64> = page.orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert!(page.has_next_page);
        assert_eq!(page.current_page, 2);

        let page = find_page(&store, &SearchFilter::All, &PageRequest::After { size: 3, after: 6 });
        assert_eq!(page.orders.len(), 1);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let store = store_with((PARALLEL_SEARCH_THRESHOLD + 50) as i64);
        let filter = SearchFilter::build(Some("1000"), None).unwrap();
        assert_eq!(count(&store, &filter), 1);
        assert_eq!(count(&store, &SearchFilter::All), PARALLEL_SEARCH_THRESHOLD + 50);
    }
}
