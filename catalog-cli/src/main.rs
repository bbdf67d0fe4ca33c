//! product-catalog - serves the product catalog page and JSON API
//!
//! Reads database settings from the environment (and `.env`), refuses to
//! start when any required variable is missing, then serves until Ctrl+C or
//! SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use catalog_core::config::REQUIRED_VARS;
use catalog_core::{AppConfig, ConfigError};

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "product-catalog",
    author,
    version,
    about = "Product catalog web server",
    long_about = "Serves the product page at /, the product list as JSON at /api/products \
                  and a health check at /health.\n\n\
                  Database settings come from DB_HOST, DB_USER, DB_PASS and DB_NAME \
                  (all required), plus optional DB_PORT and DB_CONNECT_TIMEOUT."
)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// Address to bind to (overrides BIND_HOST)
    #[arg(long, short = 'b')]
    host: Option<String>,

    /// Enable debug logging (also enabled by FLASK_ENV=development)
    #[arg(long, short = 'd')]
    debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the environment
    fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        config.server.debug |= self.debug;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables win
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(tracing_setup::TracingConfig::resolve(cli.debug)).ok();

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let ConfigError::Missing { vars } = &e {
                error!(missing = ?vars, required = ?REQUIRED_VARS, "Missing required environment variables");
            }
            return Err(e).context("invalid configuration");
        }
    };
    cli.apply(&mut config);

    info!(
        "Starting product catalog on port {} (debug: {})",
        config.server.port, config.server.debug
    );

    catalog_server::run_server(&config)
        .await
        .context("Server error")?;

    Ok(())
}
