use axum::extract::{Query, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::ServerError;
use crate::state::ServerState;

/// Generates (or passes through) a request ID, stored in request extensions and
/// echoed back as the `x-request-id` response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    req.extensions_mut().insert(id.clone());
    let mut response = next.run(req).await;
    if let Ok(value) = id.parse() {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Structured start/end logging around every request.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let request_id = req
        .extensions()
        .get::<String>()
        .cloned()
        .unwrap_or_default();

    tracing::info!(%method, %uri, %request_id, "request_started");
    let start = Instant::now();
    let response = next.run(req).await;
    tracing::info!(
        %method,
        %uri,
        %request_id,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "request_completed"
    );
    response
}

fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-rate-key")
        .or_else(|| headers.get("x-forwarded-for"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("anonymous")
        .to_string()
}

/// Admission control for the `/search` and `/feedback` routes: per-client rate limiting
/// against the search bucket.
pub async fn search_admission(
    State(state): State<Arc<ServerState>>,
    req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let key = client_key(req.headers());
    if !state.check_search_rate_limit(&key) {
        return Err(ServerError::RateLimitExceeded);
    }
    Ok(next.run(req).await)
}

/// Admission control for `/admin/*` routes: admin-bucket rate limiting plus the shared
/// admin-token gate (`x-admin-token` header or `?token=` query param).
pub async fn admin_admission(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let key = client_key(req.headers());
    if !state.check_admin_rate_limit(&key) {
        return Err(ServerError::RateLimitExceeded);
    }

    let token = req
        .headers()
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| query.get("token").cloned());

    if !state.is_admin_authorized(token.as_deref()) {
        return Err(ServerError::Unauthorized);
    }

    Ok(next.run(req).await)
}
