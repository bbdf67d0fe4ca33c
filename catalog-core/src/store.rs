//! Storage seam between the reader and a concrete database driver
//!
//! A `ConnectionProvider` opens one short-lived connection per call. There is
//! no pooling: every request gets its own connection and closes it.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::Product;

/// The only query this system runs
pub const PRODUCTS_QUERY: &str = "SELECT id, name, price, image_url FROM products ORDER BY id";

/// An open connection that can read the products table.
///
/// Dropping a connection that was never closed must still release it.
#[async_trait]
pub trait ProductConnection: Send {
    /// Run `PRODUCTS_QUERY` and collect every row in store order.
    async fn fetch_products(&mut self) -> Result<Vec<Product>, StoreError>;

    /// Release the underlying connection.
    async fn close(&mut self) -> Result<(), StoreError>;
}

/// Opens connections to the store.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Open a new connection.
    ///
    /// # Errors
    ///
    /// `StoreError::Connection` or `StoreError::Timeout` when no usable
    /// connection could be obtained.
    async fn acquire(&self) -> Result<Box<dyn ProductConnection>, StoreError>;
}
