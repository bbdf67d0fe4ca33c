//! MySQL connection provider
//!
//! Opens a fresh `MySqlConnection` for every `acquire`, bounded by the
//! configured connect timeout. Connection errors are returned as
//! `StoreError` values, never panics.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;

use catalog_core::{ConnectionProvider, DbConfig, Product, ProductConnection, StoreError, PRODUCTS_QUERY};

/// Opens one short-lived MySQL connection per call.
#[derive(Debug, Clone)]
pub struct MySqlProvider {
    options: MySqlConnectOptions,
    connect_timeout: Duration,
}

impl MySqlProvider {
    /// Build connect options from configuration. Does not touch the network.
    pub fn new(config: &DbConfig) -> Self {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .charset(&config.charset);

        Self {
            options,
            connect_timeout: config.connect_timeout,
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

#[async_trait]
impl ConnectionProvider for MySqlProvider {
    async fn acquire(&self) -> Result<Box<dyn ProductConnection>, StoreError> {
        let connect = MySqlConnection::connect_with(&self.options);

        match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(conn)) => Ok(Box::new(MySqlProductConnection { conn: Some(conn) })),
            Ok(Err(e)) => Err(StoreError::connection(e)),
            Err(_) => Err(StoreError::Timeout {
                timeout: self.connect_timeout,
            }),
        }
    }
}

/// An open connection; `None` once closed
struct MySqlProductConnection {
    conn: Option<MySqlConnection>,
}

#[async_trait]
impl ProductConnection for MySqlProductConnection {
    async fn fetch_products(&mut self) -> Result<Vec<Product>, StoreError> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| StoreError::query("connection already closed"))?;

        sqlx::query_as::<_, Product>(PRODUCTS_QUERY)
            .fetch_all(conn)
            .await
            .map_err(StoreError::query)
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        match self.conn.take() {
            Some(conn) => conn.close().await.map_err(StoreError::close),
            None => Ok(()),
        }
    }
}
