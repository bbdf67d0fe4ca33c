//! Product reader
//!
//! Acquire, query, release. Storage failures are logged here and turned into
//! an empty list by `fetch_all`; `try_fetch_all` keeps them as a `Result` for
//! callers that want to tell "no products" from "storage unavailable".

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::StoreError;
use crate::model::Product;
use crate::store::{ConnectionProvider, ProductConnection};

/// Reads the full product list, one connection per call
#[derive(Clone)]
pub struct ProductReader {
    provider: Arc<dyn ConnectionProvider>,
}

impl ProductReader {
    pub fn new(provider: Arc<dyn ConnectionProvider>) -> Self {
        Self { provider }
    }

    pub fn from_provider(provider: impl ConnectionProvider + 'static) -> Self {
        Self::new(Arc::new(provider))
    }

    /// All products in ascending `id` order, or an empty list if storage
    /// could not be read. Never fails.
    pub async fn fetch_all(&self) -> Vec<Product> {
        match self.try_fetch_all().await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Product read failed, returning empty list");
                Vec::new()
            }
        }
    }

    /// All products in ascending `id` order.
    ///
    /// The connection is closed exactly once on every path that opened one,
    /// before this returns. A failed close is logged and does not change the
    /// outcome of the query.
    ///
    /// # Errors
    ///
    /// Returns the acquisition or query error.
    pub async fn try_fetch_all(&self) -> Result<Vec<Product>, StoreError> {
        let mut scope = ConnectionScope::new(self.provider.acquire().await?);
        debug!("Database connection acquired");

        let result = scope.fetch_products().await;
        scope.close().await;

        let products = result?;
        info!(count = products.len(), "Retrieved {} products", products.len());
        Ok(products)
    }
}

/// Owns an acquired connection until it is released.
///
/// `close` is the normal path. If the scope is dropped with the connection
/// still open (a panic in the query, or the caller's future being dropped),
/// the connection is dropped with it.
struct ConnectionScope {
    conn: Option<Box<dyn ProductConnection>>,
}

impl ConnectionScope {
    fn new(conn: Box<dyn ProductConnection>) -> Self {
        Self { conn: Some(conn) }
    }

    async fn fetch_products(&mut self) -> Result<Vec<Product>, StoreError> {
        match self.conn.as_mut() {
            Some(conn) => conn.fetch_products().await,
            None => Err(StoreError::query("connection already released")),
        }
    }

    async fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                warn!(error = %e, "Failed to close database connection");
            }
        }
    }
}

impl Drop for ConnectionScope {
    fn drop(&mut self) {
        if self.conn.take().is_some() {
            warn!("Database connection released without close");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_products, FakeProvider};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::time::Duration;

    #[tokio::test]
    async fn returns_rows_and_closes_once() {
        let provider = FakeProvider::with_rows(sample_products());
        let reader = ProductReader::from_provider(provider.clone());

        let products = reader.fetch_all().await;

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name.as_deref(), Some("Test Product 1"));
        assert_eq!(products[1].price, Decimal::new(3999, 2));
        assert_eq!(provider.acquired(), 1);
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn acquisition_failure_yields_empty_without_close() {
        let provider = FakeProvider::unreachable();
        let reader = ProductReader::from_provider(provider.clone());

        assert!(reader.fetch_all().await.is_empty());
        assert_eq!(provider.acquired(), 0);
        assert_eq!(provider.closed(), 0);

        let err = reader.try_fetch_all().await.unwrap_err();
        assert!(err.is_acquisition_failure());
    }

    #[tokio::test]
    async fn query_failure_yields_empty_and_still_closes() {
        let provider = FakeProvider::failing_query();
        let reader = ProductReader::from_provider(provider.clone());

        assert!(reader.fetch_all().await.is_empty());
        assert_eq!(provider.acquired(), 1);
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn close_failure_does_not_discard_rows() {
        let provider = FakeProvider::with_rows(sample_products()).fail_on_close();
        let reader = ProductReader::from_provider(provider.clone());

        assert_eq!(reader.fetch_all().await.len(), 2);
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn every_call_opens_a_fresh_connection() {
        let provider = FakeProvider::with_rows(sample_products());
        let reader = ProductReader::from_provider(provider.clone());

        reader.fetch_all().await;
        reader.fetch_all().await;
        reader.fetch_all().await;

        assert_eq!(provider.acquired(), 3);
        assert_eq!(provider.closed(), 3);
    }

    #[tokio::test]
    async fn empty_table_is_ok_not_error() {
        let provider = FakeProvider::with_rows(Vec::new());
        let reader = ProductReader::from_provider(provider.clone());

        assert!(reader.try_fetch_all().await.unwrap().is_empty());
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn panicking_query_still_releases_connection() {
        let provider = FakeProvider::panicking();
        let reader = ProductReader::from_provider(provider.clone());

        let handle = tokio::spawn(async move { reader.fetch_all().await });
        let err = handle.await.unwrap_err();

        assert!(err.is_panic());
        assert_eq!(provider.acquired(), 1);
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn abandoned_read_releases_connection() {
        let provider = FakeProvider::hanging();
        let reader = ProductReader::from_provider(provider.clone());

        let outcome = tokio::time::timeout(Duration::from_millis(20), reader.fetch_all()).await;

        assert!(outcome.is_err());
        assert_eq!(provider.acquired(), 1);
        assert_eq!(provider.closed(), 1);
    }

    proptest! {
        #[test]
        fn preserves_ascending_id_order(ids in proptest::collection::btree_set(1i64..100_000, 0..50)) {
            let rows: Vec<Product> = ids
                .iter()
                .map(|&id| {
                    Product::new(id, format!("Product {id}"), Decimal::new(id, 2), format!("http://x/{id}.jpg"))
                })
                .collect();
            let provider = FakeProvider::with_rows(rows.clone());
            let reader = ProductReader::from_provider(provider.clone());

            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let products = runtime.block_on(reader.fetch_all());

            prop_assert_eq!(&products, &rows);
            prop_assert!(products.windows(2).all(|w| w[0].id < w[1].id));
            prop_assert_eq!(provider.closed(), 1);
        }
    }
}
