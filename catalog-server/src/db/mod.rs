//! Database layer - per-request MySQL connections
//!
//! # Design Principles
//!
//! - One connection per request, closed before the response is built
//! - No pool: nothing is shared between requests
//! - Connect attempts are bounded by the configured timeout

pub mod connection;

pub use connection::MySqlProvider;
