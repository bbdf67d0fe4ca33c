/// Structured error types for catalog-core.
///
/// `ConfigError` is fatal at startup. `StoreError` never leaves
/// `ProductReader::fetch_all`; it is logged there and turned into an
/// empty product list.

use std::time::Duration;
use thiserror::Error;

/// Startup configuration failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are unset or empty
    #[error("Missing required environment variables: {}", vars.join(", "))]
    Missing { vars: Vec<&'static str> },

    /// A variable is set but cannot be parsed
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Storage access failed
#[derive(Error, Debug)]
pub enum StoreError {
    /// Could not open a connection (network, auth, refused)
    #[error("Database connection failed: {reason}")]
    Connection { reason: String },

    /// Connection attempt exceeded the configured timeout
    #[error("Database connection timed out after {}s", timeout.as_secs())]
    Timeout { timeout: Duration },

    /// The products query failed on an open connection
    #[error("Error fetching products: {reason}")]
    Query { reason: String },

    /// Closing the connection failed
    #[error("Error closing database connection: {reason}")]
    Close { reason: String },
}

impl ConfigError {
    pub fn invalid(var: &'static str, value: impl Into<String>, reason: impl ToString) -> Self {
        Self::Invalid {
            var,
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

impl StoreError {
    pub fn connection(reason: impl ToString) -> Self {
        Self::Connection {
            reason: reason.to_string(),
        }
    }

    pub fn query(reason: impl ToString) -> Self {
        Self::Query {
            reason: reason.to_string(),
        }
    }

    pub fn close(reason: impl ToString) -> Self {
        Self::Close {
            reason: reason.to_string(),
        }
    }

    /// True when no connection was obtained at all
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}
