//! In-memory storage fakes
//!
//! `FakeProvider` hands out connections that serve canned rows (or fail in a
//! chosen way) and counts acquisitions and closes so tests can check the
//! release discipline of `ProductReader`. A connection dropped while still
//! open counts as closed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::model::Product;
use crate::store::{ConnectionProvider, ProductConnection};

/// How the fake store behaves
#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// Query succeeds with these rows
    Rows(Vec<Product>),
    /// `acquire` fails
    Unreachable,
    /// `acquire` succeeds, the query fails
    QueryError,
    /// The query panics (simulates an unhandled fault)
    Panic,
    /// The query never completes
    Hang,
}

#[derive(Debug, Default)]
struct Counters {
    acquired: AtomicUsize,
    closed: AtomicUsize,
}

/// Provider whose clones share one set of counters
#[derive(Debug, Clone)]
pub struct FakeProvider {
    behavior: FakeBehavior,
    fail_close: bool,
    counters: Arc<Counters>,
}

impl FakeProvider {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            fail_close: false,
            counters: Arc::default(),
        }
    }

    pub fn with_rows(rows: Vec<Product>) -> Self {
        Self::new(FakeBehavior::Rows(rows))
    }

    pub fn unreachable() -> Self {
        Self::new(FakeBehavior::Unreachable)
    }

    pub fn failing_query() -> Self {
        Self::new(FakeBehavior::QueryError)
    }

    pub fn panicking() -> Self {
        Self::new(FakeBehavior::Panic)
    }

    pub fn hanging() -> Self {
        Self::new(FakeBehavior::Hang)
    }

    /// Make `close` report an error (it still counts as a release)
    pub fn fail_on_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Connections handed out so far
    pub fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    /// Connections closed so far
    pub fn closed(&self) -> usize {
        self.counters.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionProvider for FakeProvider {
    async fn acquire(&self) -> Result<Box<dyn ProductConnection>, StoreError> {
        if matches!(self.behavior, FakeBehavior::Unreachable) {
            return Err(StoreError::connection("connection refused"));
        }

        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            behavior: self.behavior.clone(),
            fail_close: self.fail_close,
            counters: Arc::clone(&self.counters),
            open: true,
        }))
    }
}

struct FakeConnection {
    behavior: FakeBehavior,
    fail_close: bool,
    counters: Arc<Counters>,
    open: bool,
}

#[async_trait]
impl ProductConnection for FakeConnection {
    async fn fetch_products(&mut self) -> Result<Vec<Product>, StoreError> {
        assert!(self.open, "query on a closed connection");
        match &self.behavior {
            FakeBehavior::Rows(rows) => Ok(rows.clone()),
            FakeBehavior::QueryError => Err(StoreError::query("Table 'products' doesn't exist")),
            FakeBehavior::Panic => panic!("simulated fault while reading products"),
            FakeBehavior::Hang => std::future::pending().await,
            FakeBehavior::Unreachable => unreachable!("unreachable provider never connects"),
        }
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        assert!(self.open, "connection closed twice");
        self.open = false;
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(StoreError::close("broken pipe"));
        }
        Ok(())
    }
}

// Dropping an open connection releases it, like dropping a driver connection
impl Drop for FakeConnection {
    fn drop(&mut self) {
        if self.open {
            self.open = false;
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// The two rows used across the test suites
pub fn sample_products() -> Vec<Product> {
    vec![
        Product::new(
            1,
            "Test Product 1",
            Decimal::new(2999, 2),
            "http://example.com/image1.jpg",
        ),
        Product::new(
            2,
            "Test Product 2",
            Decimal::new(3999, 2),
            "http://example.com/image2.jpg",
        ),
    ]
}
