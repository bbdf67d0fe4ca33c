//! Product endpoints
//!
//! Both routes answer 200 even when storage is unavailable: the reader has
//! already logged the failure and handed back an empty list.

use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Json, Router};

use catalog_core::Product;

use crate::http::page;
use crate::http::server::AppState;

/// GET / - rendered product page
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let products = state.reader.fetch_all().await;
    Html(page::render(&products, None))
}

/// GET /api/products - product list as a JSON array
async fn list_products(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.reader.fetch_all().await)
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/api/products", get(list_products))
}
