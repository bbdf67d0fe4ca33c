//! Log output for the product-catalog binary
//!
//! Debug mode is on when `--debug` is passed or `FLASK_ENV=development`.
//! The environment is read here rather than from `AppConfig`, so the mode is
//! known even when configuration fails to load and that failure is logged.
//!
//! Usage:
//!   product-catalog --debug                       # Debug logging to console
//!   FLASK_ENV=development product-catalog         # Same, from the environment
//!   RUST_LOG=catalog_core=debug product-catalog   # Fine-grained log control

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use catalog_core::config::{is_development, FLASK_ENV};

/// Filter used in debug mode when RUST_LOG is unset. Driver and HTTP
/// internals stay at info so request handling remains readable.
const DEBUG_DIRECTIVES: &str = "debug,hyper=info,hyper_util=info,sqlx=info,tower=info";
const DEFAULT_DIRECTIVES: &str = "info";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingConfig {
    pub debug: bool,
}

impl TracingConfig {
    /// Debug from the flag or from `FLASK_ENV` in the process environment
    pub fn resolve(debug_flag: bool) -> Self {
        Self::resolve_with(debug_flag, std::env::var(FLASK_ENV).ok().as_deref())
    }

    fn resolve_with(debug_flag: bool, flask_env: Option<&str>) -> Self {
        Self {
            debug: debug_flag || flask_env.is_some_and(is_development),
        }
    }

    fn directives(self) -> &'static str {
        if self.debug {
            DEBUG_DIRECTIVES
        } else {
            DEFAULT_DIRECTIVES
        }
    }
}

/// Install the global subscriber. RUST_LOG, when set, overrides the mode's
/// default filter.
pub fn init(config: TracingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directives()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
