use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use crate::error::ServerResult;
use crate::state::ServerState;

/// Liveness probe — always returns `200` once the process is serving traffic.
pub async fn health_check() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({ "status": "ok" })))
}

/// Readiness probe — reports whether the service is serving a loaded snapshot or is
/// mid-reindex, plus the identifying build/model metadata ops need to correlate an
/// incident with a deployed version.
pub async fn readiness_check(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let snapshot = state.snapshot.load();
    let status = if state.reindex.is_in_progress() {
        "reindexing"
    } else {
        "healthy"
    };
    Ok(Json(json!({
        "status": status,
        "model": state.config.embed_model,
        "vectors_loaded": snapshot.vector_index.len(),
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": option_env!("OCCUSEARCH_BUILD_TIME").unwrap_or("unknown"),
        "git_sha": option_env!("OCCUSEARCH_GIT_SHA").unwrap_or("unknown"),
    })))
}
