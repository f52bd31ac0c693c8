use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub query: String,
    #[serde(default)]
    pub selected_code: Option<String>,
    pub results_helpful: bool,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub accepted: bool,
}

/// `POST /feedback` — records whether a returned occupation code was helpful.
pub async fn submit_feedback(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(request): Json<FeedbackRequest>,
) -> ServerResult<impl IntoResponse> {
    if let Some(code) = &request.selected_code {
        let snapshot = state.snapshot.load();
        if snapshot.catalog.by_code(code).is_none() {
            return Err(ServerError::BadRequest(format!(
                "unknown occupation code '{code}'"
            )));
        }
    }

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Err(err) = state.feedback_audit.log(audit::FeedbackAuditEntry {
        timestamp: Utc::now(),
        query: request.query,
        selected_code: request.selected_code,
        results_helpful: request.results_helpful,
        comments: request.comments,
        user_agent,
    }) {
        tracing::warn!(error = %err, "feedback_audit_log_failed");
    }

    Ok(Json(FeedbackResponse { accepted: true }))
}
