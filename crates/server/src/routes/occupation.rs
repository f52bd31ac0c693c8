use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct OccupationResponse {
    pub code: String,
    pub title: String,
    pub description: String,
    pub synonyms: Vec<String>,
    pub examples: Vec<String>,
    pub hierarchy: Option<catalog::Hierarchy>,
}

/// `GET /occupation/{code}` — full record lookup by primary key.
pub async fn get_occupation(
    State(state): State<Arc<ServerState>>,
    Path(code): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let snapshot = state.snapshot.load();
    let record = snapshot
        .catalog
        .by_code(&code)
        .ok_or(ServerError::NotFound)?;

    Ok(Json(OccupationResponse {
        code: record.code.clone(),
        title: record.title.clone(),
        description: record.description.clone(),
        synonyms: record.synonyms.iter().cloned().collect(),
        examples: record.examples.clone(),
        hierarchy: record.hierarchy.clone(),
    }))
}
