//! Not-found and server-error pages
//!
//! Both render the catalog page with no products and an error banner.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::http::page;

pub const NOT_FOUND_MESSAGE: &str = "Page not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Router fallback for unmatched routes
pub async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(page::render(&[], Some(NOT_FOUND_MESSAGE))),
    )
}

/// `CatchPanicLayer` handler: logs the panic and renders the 500 page
pub fn internal_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    tracing::error!(error = %detail, "Internal server error");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(page::render(&[], Some(INTERNAL_ERROR_MESSAGE))),
    )
        .into_response()
}
