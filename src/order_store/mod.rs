//! Order Store - document store for order records
//!
//! Orders are kept in memory behind a read/write lock and persisted as one
//! JSON document per line. The store is append-only: orders arrive through
//! [`OrderStore::insert_many`] (seeding or an upstream order system) and are
//! never updated or removed through this service.

mod crud;
mod query;

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::search::SearchFilter;
use crate::types::Order;
use crate::utils::atomic_write;

pub use query::{OrderPage, PageRequest};

/// Document store for orders with an in-memory cache
pub struct OrderStore {
    pub(crate) file_path: Option<PathBuf>,
    pub(crate) orders: RwLock<Vec<Order>>,
}

impl OrderStore {
    /// Open a store backed by `file_path`, loading any existing documents
    pub fn open<P: AsRef<Path>>(file_path: P) -> StoreResult<Self> {
        let file_path = file_path.as_ref().to_path_buf();
        let orders = Self::load_from_file(&file_path)?;

        tracing::info!(
            path = %file_path.display(),
            orders = orders.len(),
            "order store loaded"
        );

        Ok(Self {
            file_path: Some(file_path),
            orders: RwLock::new(orders),
        })
    }

    /// Create a store that is never persisted
    pub fn in_memory() -> Self {
        Self {
            file_path: None,
            orders: RwLock::new(Vec::new()),
        }
    }

    /// Load documents, sort them by id and assign ids to documents without one
    fn load_from_file(file_path: &Path) -> StoreResult<Vec<Order>> {
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(file_path)?;
        let mut orders = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let order: Order = serde_json::from_str(line).map_err(|e| StoreError::Corrupt {
                line: index + 1,
                reason: e.to_string(),
            })?;
            orders.push(order);
        }

        orders.sort_by_key(|o| o.id);
        let mut next_id = orders.last().map(|o| o.id).unwrap_or(0) + 1;
        let mut assigned = 0;
        for order in orders.iter_mut().filter(|o| o.id == 0) {
            order.id = next_id;
            next_id += 1;
            assigned += 1;
        }
        orders.sort_by_key(|o| o.id);

        // Assigned ids are sort and cursor keys, so they must survive a restart
        if assigned > 0 {
            Self::rewrite_file(file_path, &orders)?;
            tracing::info!(assigned, "persisted ids for orders loaded without one");
        }

        Ok(orders)
    }

    fn rewrite_file(file_path: &Path, orders: &[Order]) -> StoreResult<()> {
        let mut content = String::new();
        for order in orders {
            content.push_str(&serde_json::to_string(order)?);
            content.push('\n');
        }
        atomic_write(file_path, &content)?;
        Ok(())
    }

    /// Number of stored orders
    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    /// Backing file, if any
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

// Operations live in submodules; these wrappers keep the public surface in one place
impl OrderStore {
    pub fn insert_many(&self, orders: Vec<Order>) -> StoreResult<Vec<Order>> {
        crud::insert_many(self, orders)
    }

    pub fn get(&self, id: u64) -> Option<Order> {
        crud::get(self, id)
    }

    pub fn max_order_id(&self) -> Option<i64> {
        crud::max_order_id(self)
    }

    pub fn find_page(&self, filter: &SearchFilter, request: &PageRequest) -> OrderPage {
        query::find_page(self, filter, request)
    }

    pub fn count(&self, filter: &SearchFilter) -> usize {
        query::count(self, filter)
    }
}
