//! HTTP server layer
//!
//! Axum server with:
//! - Product page, JSON product list, health check
//! - HTML 404 fallback and 500 page for handler panics
//! - Request tracing
//! - Graceful shutdown

pub mod page;
pub mod routes;
pub mod server;

pub use server::{build_router, run_server, AppState, ServerError};
