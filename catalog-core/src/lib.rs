//! catalog-core: the product-retrieval contract
//!
//! This crate holds everything that does not depend on a concrete database
//! driver or HTTP framework:
//! - `Product` rows and their JSON shape
//! - `AppConfig` built once from the environment at startup
//! - the `ConnectionProvider` / `ProductConnection` storage seam
//! - `ProductReader`, which runs the fixed query and always releases
//!   the connection it acquired

pub mod config;
pub mod error;
pub mod model;
pub mod reader;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{AppConfig, DbConfig, ServerSettings};
pub use error::{ConfigError, StoreError};
pub use model::Product;
pub use reader::ProductReader;
pub use store::{ConnectionProvider, ProductConnection, PRODUCTS_QUERY};
