//! Write path for the order store

use std::fs::{self, OpenOptions};
use std::io::Write;

use crate::error::StoreResult;
use crate::types::Order;

use super::OrderStore;

/// Insert orders, assigning ascending ids (holds the write lock throughout)
///
/// The documents are appended to the backing file before they become
/// visible to readers, so a failed write leaves the store unchanged.
pub fn insert_many(store: &OrderStore, orders: Vec<Order>) -> StoreResult<Vec<Order>> {
    let mut stored = store.orders.write();
    let mut next_id = stored.last().map(|o| o.id).unwrap_or(0) + 1;

    let mut created = Vec::with_capacity(orders.len());
    for mut order in orders {
        order.id = next_id;
        next_id += 1;
        created.push(order);
    }

    if let Some(path) = &store.file_path {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::new();
        for order in &created {
            content.push_str(&serde_json::to_string(order)?);
            content.push('\n');
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    stored.extend(created.iter().cloned());
    tracing::debug!(count = created.len(), "orders inserted");
    Ok(created)
}

/// Look up a single order by store id
pub fn get(store: &OrderStore, id: u64) -> Option<Order> {
    let orders = store.orders.read();
    orders
        .binary_search_by_key(&id, |o| o.id)
        .ok()
        .map(|index| orders[index].clone())
}

/// Highest business `orderID` in the store
pub fn max_order_id(store: &OrderStore) -> Option<i64> {
    store.orders.read().iter().map(|o| o.order_id).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sample_order;

    #[test]
    fn test_ids_are_sequential_across_inserts() {
        let store = OrderStore::in_memory();
        let first = store.insert_many(vec![sample_order(1), sample_order(2)]).unwrap();
        let second = store.insert_many(vec![sample_order(3)]).unwrap();

        assert_eq!(first.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(second[0].id, 3);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_missing_order() {
        let store = OrderStore::in_memory();
        store.insert_many(vec![sample_order(1)]).unwrap();
        assert!(get(&store, 1).is_some());
        assert!(get(&store, 99).is_none());
    }

    #[test]
    fn test_max_order_id() {
        let store = OrderStore::in_memory();
        assert_eq!(max_order_id(&store), None);
        store.insert_many(vec![sample_order(40), sample_order(7)]).unwrap();
        assert_eq!(max_order_id(&store), Some(40));
    }
}
