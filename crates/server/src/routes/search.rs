use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

const DEFAULT_K: usize = 5;
const MIN_K: usize = 1;
const MAX_K: usize = 20;
const MAX_QUERY_LEN: usize = 500;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub k: Option<usize>,
    /// Caller-supplied language hint; informational only — detection is always
    /// script-based and deterministic, see [`rescue::detect_language`].
    #[serde(default)]
    pub language: Option<String>,
    /// Caller-supplied pre-translated query, used by Stage C (translation rescue).
    /// This service never performs translation itself.
    #[serde(default)]
    pub translated_query: Option<String>,
    /// Optional restriction to an NCO division code.
    #[serde(default)]
    pub division_code: Option<String>,
    /// Optional restriction to an NCO minor-group code.
    #[serde(default)]
    pub minor_group_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchHitResponse {
    pub code: String,
    pub title: String,
    pub description: String,
    pub score: f32,
    pub confidence: f32,
    pub matched_synonyms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHitResponse>,
    pub low_confidence: bool,
    pub language: String,
    pub translated: bool,
    pub suggestions: Vec<String>,
    pub alternatives: Vec<String>,
}

/// `POST /search` — runs the query-rescue cascade and logs a best-effort audit entry.
pub async fn search(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SearchRequest>,
) -> ServerResult<impl IntoResponse> {
    if request.query.trim().is_empty() {
        return Err(ServerError::BadRequest("query must not be empty".to_string()));
    }
    if request.query.chars().count() > MAX_QUERY_LEN {
        return Err(ServerError::BadRequest(format!(
            "query must not exceed {MAX_QUERY_LEN} characters"
        )));
    }
    let k = request.k.unwrap_or(DEFAULT_K);
    if !(MIN_K..=MAX_K).contains(&k) {
        return Err(ServerError::BadRequest(format!(
            "k must be between {MIN_K} and {MAX_K}"
        )));
    }

    let snapshot = state.snapshot.load();
    let embed_cfg = state.config.embed_config();
    let rescue_cfg = state.config.rescue_config();

    let filter = rescue::HierarchyFilter {
        division_code: request.division_code.clone(),
        minor_group_code: request.minor_group_code.clone(),
    };

    let started = Instant::now();
    let outcome = rescue::search(
        &snapshot.catalog,
        &snapshot.vector_index,
        &snapshot.keyword_index,
        &snapshot.synonym_bank,
        &embed_cfg,
        &rescue_cfg,
        &request.query,
        request.translated_query.as_deref(),
        k,
        &filter,
    )
    .await?;
    let latency_ms = started.elapsed().as_millis() as u64;

    let top_code = outcome.hits.first().map(|h| h.code.clone());
    let top_score = outcome.hits.first().map(|h| h.score);
    let top_confidence = outcome.hits.first().map(|h| h.confidence);
    let top_k_codes = outcome.hits.iter().map(|h| h.code.clone()).collect::<Vec<_>>();
    let result_count = outcome.hits.len();
    let language = outcome.language.as_str().to_string();
    let low_confidence = outcome.low_confidence;

    if let Err(err) = state.search_audit.log(audit::SearchAuditEntry {
        timestamp: Utc::now(),
        query: request.query.clone(),
        language: language.clone(),
        k,
        low_confidence,
        result_count,
        top_code,
        top_score,
        top_confidence,
        top_k_codes,
        latency_ms,
        model_id: state.config.embed_model.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }) {
        tracing::warn!(error = %err, "search_audit_log_failed");
    }

    Ok(Json(SearchResponse {
        results: outcome
            .hits
            .into_iter()
            .map(|h| SearchHitResponse {
                code: h.code,
                title: h.title,
                description: h.description,
                score: h.score,
                confidence: h.confidence,
                matched_synonyms: h.matched_synonyms,
            })
            .collect(),
        low_confidence,
        language,
        translated: outcome.translated,
        suggestions: outcome.suggestions,
        alternatives: outcome.alternatives,
    }))
}
