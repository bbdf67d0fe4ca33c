//! Axum server setup
//!
//! Server skeleton with:
//! - Panic catching mapped to the 500 page
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use catalog_core::{AppConfig, ProductReader};

use super::routes;
use crate::db::MySqlProvider;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reader: ProductReader,
}

impl AppState {
    pub fn new(reader: ProductReader) -> Self {
        Self { reader }
    }
}

/// Build the application router.
///
/// Separate from `run_server` so tests can drive it with any
/// `ConnectionProvider`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::products::router())
        .fallback(routes::fallback::not_found)
        .layer(CatchPanicLayer::custom(routes::fallback::internal_error))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let config = AppConfig::from_env()?;
/// run_server(&config).await?;
/// ```
pub async fn run_server(config: &AppConfig) -> Result<(), ServerError> {
    let provider = MySqlProvider::new(&config.db);
    tracing::info!(
        db_host = %config.db.host,
        db_port = config.db.port,
        database = %config.db.database,
        connect_timeout_secs = config.db.connect_timeout.as_secs(),
        "Database settings loaded"
    );

    let app = build_router(AppState::new(ProductReader::from_provider(provider)));

    let bind = (config.server.host.as_str(), config.server.port);
    let listener = TcpListener::bind(bind).await.map_err(|source| ServerError::Bind {
        addr: format!("{}:{}", config.server.host, config.server.port),
        source,
    })?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use catalog_core::testing::{sample_products, FakeProvider};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(provider: FakeProvider) -> Router {
        build_router(AppState::new(ProductReader::from_provider(provider)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn index_lists_products() {
        let provider = FakeProvider::with_rows(sample_products());
        let (status, body) = get(app(provider.clone()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Test Product 1"));
        assert!(body.contains("Test Product 2"));
        assert!(body.contains("29.99"));
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn index_is_ok_when_database_unreachable() {
        let (status, body) = get(app(FakeProvider::unreachable()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Product Catalog"));
        assert!(body.contains("No products available"));
    }

    #[tokio::test]
    async fn index_is_ok_when_query_fails() {
        let provider = FakeProvider::failing_query();
        let (status, body) = get(app(provider.clone()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No products available"));
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn index_serves_html() {
        let response = app(FakeProvider::with_rows(Vec::new()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
    }

    #[tokio::test]
    async fn health_ignores_storage() {
        let provider = FakeProvider::unreachable();
        let (status, body) = get(app(provider.clone()), "/health").await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({"status": "healthy", "service": "product-catalog"}));
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn api_returns_one_object_per_row() {
        let (status, body) = get(app(FakeProvider::with_rows(sample_products())), "/api/products").await;
        assert_eq!(status, StatusCode::OK);

        let items: Vec<Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(items.len(), 2);
        for item in &items {
            let mut keys: Vec<&str> = item.as_object().unwrap().keys().map(String::as_str).collect();
            keys.sort_unstable();
            assert_eq!(keys, ["id", "image_url", "name", "price"]);
        }

        assert_eq!(items[0]["id"], json!(1));
        assert_eq!(items[0]["name"], json!("Test Product 1"));
        assert_eq!(items[0]["price"], json!("29.99"));
        assert_eq!(items[1]["price"], json!("39.99"));
        assert_eq!(items[1]["image_url"], json!("http://example.com/image2.jpg"));
    }

    #[tokio::test]
    async fn api_returns_empty_array_on_failure() {
        let (status, body) = get(app(FakeProvider::unreachable()), "/api/products").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn unknown_route_is_404_page() {
        let provider = FakeProvider::with_rows(sample_products());
        let (status, body) = get(app(provider.clone()), "/does-not-exist").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page not found"));
        assert!(!body.contains("Test Product 1"));
        assert_eq!(provider.acquired(), 0);
    }

    #[tokio::test]
    async fn handler_panic_is_500_page() {
        let provider = FakeProvider::panicking();
        let (status, body) = get(app(provider.clone()), "/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Internal server error"));
        assert_eq!(provider.acquired(), 1);
        assert_eq!(provider.closed(), 1);
    }

    #[tokio::test]
    async fn server_keeps_serving_after_panic() {
        let router = app(FakeProvider::panicking());

        let (status, _) = get(router.clone(), "/").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = get(router, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
