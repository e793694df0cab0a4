//! Order search: filter construction and pagination cursors
//!
//! This module turns the `search` / `searchFields` arguments of the `orders`
//! query into a [`SearchFilter`] that the order store evaluates, and encodes
//! the opaque cursors handed back with each edge.

mod cursor;
mod filter;

pub use cursor::{decode_cursor, encode_cursor};
pub use filter::{Condition, SearchField, SearchFilter};
