//! Opaque pagination cursors
//!
//! A cursor is the base64 encoding of the record id rendered as a decimal
//! string. Clients treat it as opaque.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::QueryError;

/// Encode a record id as a cursor
pub fn encode_cursor(id: u64) -> String {
    STANDARD.encode(id.to_string())
}

/// Decode a cursor back into the record id it points at
pub fn decode_cursor(cursor: &str) -> Result<u64, QueryError> {
    let bytes = STANDARD
        .decode(cursor.trim())
        .map_err(|_| QueryError::InvalidCursor(cursor.to_string()))?;
    std::str::from_utf8(&bytes)
        .ok()
        .and_then(|text| text.parse::<u64>().ok())
        .ok_or_else(|| QueryError::InvalidCursor(cursor.to_string()))
}
