//! HTTP route handlers, one module per resource.

pub mod admin;
pub mod feedback;
pub mod health;
pub mod occupation;
pub mod search;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::error::{ServerError, ServerResult};

/// `GET /` — service info and endpoint listing.
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "occusearch",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/health",
            "/search",
            "/occupation/{code}",
            "/feedback",
            "/admin/logs",
            "/admin/stats",
            "/admin/update-synonyms",
            "/admin/reindex"
        ]
    })))
}

pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
