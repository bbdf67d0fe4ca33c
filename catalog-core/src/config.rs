//! Startup configuration
//!
//! Built once from environment variables and passed by reference to the
//! connection provider and server. Required keys are validated together so
//! a single error names every missing variable.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

pub const DB_HOST: &str = "DB_HOST";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASS: &str = "DB_PASS";
pub const DB_NAME: &str = "DB_NAME";
pub const DB_PORT: &str = "DB_PORT";
pub const DB_CONNECT_TIMEOUT: &str = "DB_CONNECT_TIMEOUT";
pub const PORT: &str = "PORT";
pub const BIND_HOST: &str = "BIND_HOST";
pub const FLASK_ENV: &str = "FLASK_ENV";

/// Variables that must be set (and non-empty) for the process to start
pub const REQUIRED_VARS: [&str; 4] = [DB_HOST, DB_USER, DB_PASS, DB_NAME];

const DEFAULT_DB_PORT: u16 = 3306;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_CHARSET: &str = "utf8mb4";
const DEVELOPMENT_ENV: &str = "development";

/// Connection settings for the relational store
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    pub connect_timeout: Duration,
}

// Hand-written so the password never reaches logs
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("charset", &self.charset)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Listen address and debug mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Verbose logging, enabled by `FLASK_ENV=development`
    pub debug: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_BIND_HOST.to_string(),
            port: DEFAULT_PORT,
            debug: false,
        }
    }
}

/// Complete process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db: DbConfig,
    pub server: ServerSettings,
}

impl AppConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` if any of `REQUIRED_VARS` is unset or empty,
    /// `ConfigError::Invalid` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty strings count as unset
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing { vars: missing });
        }

        let required = |key: &'static str| get(key).unwrap_or_default();

        let db = DbConfig {
            host: required(DB_HOST),
            port: parse_or(get(DB_PORT), DB_PORT, DEFAULT_DB_PORT)?,
            user: required(DB_USER),
            password: required(DB_PASS),
            database: required(DB_NAME),
            charset: DEFAULT_CHARSET.to_string(),
            connect_timeout: Duration::from_secs(parse_or(
                get(DB_CONNECT_TIMEOUT),
                DB_CONNECT_TIMEOUT,
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )?),
        };

        let server = ServerSettings {
            host: get(BIND_HOST).unwrap_or_else(|| DEFAULT_BIND_HOST.to_string()),
            port: parse_or(get(PORT), PORT, DEFAULT_PORT)?,
            debug: get(FLASK_ENV).is_some_and(|v| is_development(&v)),
        };

        Ok(Self { db, server })
    }
}

/// Whether a `FLASK_ENV` value selects development mode
pub fn is_development(value: &str) -> bool {
    value == DEVELOPMENT_ENV
}

fn parse_or<T>(raw: Option<String>, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid(var, value.clone(), e)),
    }
}
