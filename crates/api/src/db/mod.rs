//! Database operations for the Shoplite SQLite store.
//!
//! ## Tables
//!
//! - `product` - Products for sale (name, price)
//! - `orders` - Orders (id only; value is derived from line items)
//! - `line_item` - One product × quantity within one order
//! - `shop` - Shops (unique name)
//! - `shop_product` / `shop_order` - Many-to-many link tables
//!
//! The schema is created on startup via [`Store::initialize`]
//! (`CREATE TABLE IF NOT EXISTS`; calling it again is a no-op).

pub mod queries;
pub mod seed;
mod store;

use thiserror::Error;

pub use store::{LineItemRow, OrderRow, ProductRow, ShopRow, Store};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Establishing or closing the SQLite session failed.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// An operation was invoked before `connect` or after `release`.
    #[error("store is not connected")]
    NotConnected,

    /// Referential-integrity or uniqueness violation on a write.
    #[error("constraint violation: {0}")]
    Constraint(#[source] sqlx::Error),

    /// Any other database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
