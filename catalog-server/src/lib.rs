//! catalog-server: HTTP server for the product catalog
//!
//! Serves the product page, the JSON product list and a health check on top
//! of a per-request MySQL connection.

pub mod db;
pub mod http;

pub use db::MySqlProvider;
pub use http::{build_router, run_server, AppState, ServerError};
