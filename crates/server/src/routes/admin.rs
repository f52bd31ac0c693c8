use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    #[serde(default = "default_log_type")]
    #[serde(rename = "type")]
    pub log_type: String,
    #[serde(default = "default_log_limit")]
    pub limit: usize,
    /// `fields=basic` projects the search stream down to `{timestamp, query, top_code,
    /// low_confidence}`, dropping latency/model/top-k detail.
    #[serde(default)]
    pub fields: Option<String>,
}

const BASIC_SEARCH_FIELDS: [&str; 4] = ["timestamp", "query", "top_code", "low_confidence"];

fn project_basic(entry: serde_json::Value) -> serde_json::Value {
    let mut projected = serde_json::Map::new();
    if let serde_json::Value::Object(map) = entry {
        for field in BASIC_SEARCH_FIELDS {
            if let Some(value) = map.get(field) {
                projected.insert(field.to_string(), value.clone());
            }
        }
    }
    serde_json::Value::Object(projected)
}

fn default_log_type() -> String {
    "search".to_string()
}
fn default_log_limit() -> usize {
    50
}

fn log_path(state: &ServerState, log_type: &str) -> ServerResult<PathBuf> {
    let file_name = match log_type {
        "search" => "search.jsonl",
        "feedback" => "feedback.jsonl",
        "audit" => "audit.jsonl",
        other => {
            return Err(ServerError::BadRequest(format!(
                "unknown log type '{other}'"
            )))
        }
    };
    Ok(PathBuf::from(&state.config.audit_dir).join(file_name))
}

/// `GET /admin/logs?type=search|feedback|audit&limit=N` — most-recent-first tail.
pub async fn list_logs(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<LogsQuery>,
) -> ServerResult<impl IntoResponse> {
    let path = log_path(&state, &query.log_type)?;
    let mut entries = audit::read_logs_reverse(path, query.limit)?;
    if query.log_type == "search" && query.fields.as_deref() == Some("basic") {
        entries = entries.into_iter().map(project_basic).collect();
    }
    Ok(Json(serde_json::json!({ "entries": entries })))
}

#[derive(Debug, Deserialize)]
pub struct DeleteLogsQuery {
    #[serde(rename = "type")]
    pub log_type: String,
    pub since: DateTime<Utc>,
}

/// `DELETE /admin/logs?type=...&since=...` — drops entries at/after `since`.
pub async fn delete_logs(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<DeleteLogsQuery>,
) -> ServerResult<impl IntoResponse> {
    let path = log_path(&state, &query.log_type)?;
    let removed = audit::delete_since(path, query.since)?;
    log_admin_action(&state, "delete_logs", serde_json::json!({ "type": query.log_type, "removed": removed }));
    Ok(Json(serde_json::json!({ "removed": removed })))
}

#[derive(Debug, Deserialize)]
pub struct PurgeLogsQuery {
    #[serde(rename = "type")]
    pub log_type: String,
}

/// `POST /admin/purge-logs?type=...` — truncates a log file entirely.
pub async fn purge_logs(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PurgeLogsQuery>,
) -> ServerResult<impl IntoResponse> {
    let path = log_path(&state, &query.log_type)?;
    audit::purge_all(path)?;
    log_admin_action(&state, "purge_logs", serde_json::json!({ "type": query.log_type }));
    Ok(Json(serde_json::json!({ "purged": true })))
}

#[derive(Debug, Serialize, Default)]
struct StatsWindow {
    total_searches: usize,
    low_confidence_rate: f32,
    avg_latency_ms: f32,
}

#[derive(Debug, Default)]
struct WindowAccum {
    total: usize,
    low_confidence: usize,
    total_latency_ms: u64,
}

impl WindowAccum {
    fn accumulate(&mut self, low_confidence: bool, latency_ms: u64) {
        self.total += 1;
        if low_confidence {
            self.low_confidence += 1;
        }
        self.total_latency_ms += latency_ms;
    }

    fn finish(self) -> StatsWindow {
        StatsWindow {
            total_searches: self.total,
            low_confidence_rate: if self.total > 0 {
                self.low_confidence as f32 / self.total as f32
            } else {
                0.0
            },
            avg_latency_ms: if self.total > 0 {
                self.total_latency_ms as f32 / self.total as f32
            } else {
                0.0
            },
        }
    }
}

#[derive(Debug, Serialize, Default)]
struct Stats {
    last_24h: StatsWindow,
    all_time: StatsWindow,
    top_queries: Vec<(String, usize)>,
    top_codes: Vec<(String, usize)>,
    feedback_helpful_rate: f32,
}

const STATS_SAMPLE_SIZE: usize = 5000;

/// `GET /admin/stats` — aggregates over the most recent search and feedback log
/// entries, windowed to the last 24 hours and all-time.
pub async fn stats(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    let search_path = log_path(&state, "search")?;
    let entries = audit::read_logs_reverse(search_path, STATS_SAMPLE_SIZE)?;
    let cutoff = Utc::now() - chrono::Duration::hours(24);

    let mut query_counts: HashMap<String, usize> = HashMap::new();
    let mut code_counts: HashMap<String, usize> = HashMap::new();
    let mut all_time = WindowAccum::default();
    let mut last_24h = WindowAccum::default();

    for entry in &entries {
        if let Some(query) = entry.get("query").and_then(|v| v.as_str()) {
            *query_counts.entry(query.to_lowercase()).or_insert(0) += 1;
        }
        if let Some(code) = entry.get("top_code").and_then(|v| v.as_str()) {
            *code_counts.entry(code.to_string()).or_insert(0) += 1;
        }
        let low_confidence = entry.get("low_confidence").and_then(|v| v.as_bool()) == Some(true);
        let latency_ms = entry.get("latency_ms").and_then(|v| v.as_u64()).unwrap_or(0);
        let in_last_24h = entry
            .get("timestamp")
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|ts| ts.with_timezone(&Utc) >= cutoff)
            .unwrap_or(false);

        all_time.accumulate(low_confidence, latency_ms);
        if in_last_24h {
            last_24h.accumulate(low_confidence, latency_ms);
        }
    }

    let mut top_queries: Vec<(String, usize)> = query_counts.into_iter().collect();
    top_queries.sort_by(|a, b| b.1.cmp(&a.1));
    top_queries.truncate(10);

    let mut top_codes: Vec<(String, usize)> = code_counts.into_iter().collect();
    top_codes.sort_by(|a, b| b.1.cmp(&a.1));
    top_codes.truncate(10);

    let feedback_path = log_path(&state, "feedback")?;
    let feedback_entries = audit::read_logs_reverse(feedback_path, STATS_SAMPLE_SIZE)?;
    let total_feedback = feedback_entries.len();
    let helpful_feedback = feedback_entries
        .iter()
        .filter(|e| e.get("results_helpful").and_then(|v| v.as_bool()) == Some(true))
        .count();

    Ok(Json(Stats {
        last_24h: last_24h.finish(),
        all_time: all_time.finish(),
        top_queries,
        top_codes,
        feedback_helpful_rate: if total_feedback > 0 {
            helpful_feedback as f32 / total_feedback as f32
        } else {
            0.0
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSynonymsRequest {
    /// Code -> synonyms to add to that record's synonym set.
    #[serde(default)]
    pub add: HashMap<String, Vec<String>>,
    /// Code -> synonyms to remove from that record's synonym set.
    #[serde(default)]
    pub remove: HashMap<String, Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSynonymsResponse {
    pub updated_count: usize,
    pub invalid_codes: Vec<String>,
    pub requires_reindex: bool,
}

/// `POST /admin/update-synonyms` — batch add/remove of synonym terms on existing
/// catalog codes. Rewrites the catalog file on disk; takes effect only on the next
/// `/admin/reindex`, since synonyms feed both the embedded passage text and the
/// keyword index. Unknown codes are reported, not treated as a hard error.
pub async fn update_synonyms(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<UpdateSynonymsRequest>,
) -> ServerResult<impl IntoResponse> {
    let snapshot = state.snapshot.load();
    let mut records: Vec<catalog::OccupationRecord> = snapshot.catalog.iter().cloned().collect();

    let mut invalid_codes = Vec::new();
    let mut updated_count = 0usize;

    for (code, synonyms) in &request.add {
        match records.iter_mut().find(|r| &r.code == code) {
            Some(record) => {
                for synonym in synonyms {
                    record.synonyms.insert(synonym.clone());
                }
                updated_count += 1;
            }
            None => invalid_codes.push(code.clone()),
        }
    }
    for (code, synonyms) in &request.remove {
        match records.iter_mut().find(|r| &r.code == code) {
            Some(record) => {
                for synonym in synonyms {
                    record.synonyms.remove(synonym);
                }
                updated_count += 1;
            }
            None => invalid_codes.push(code.clone()),
        }
    }

    let requires_reindex = updated_count > 0;
    if requires_reindex {
        let bytes = serde_json::to_vec_pretty(&records)
            .map_err(|e| ServerError::Internal(anyhow::Error::new(e)))?;
        tokio::fs::write(&state.config.catalog_path, bytes)
            .await
            .map_err(|e| ServerError::Internal(anyhow::Error::new(e)))?;
    }

    log_admin_action(
        &state,
        "update_synonyms",
        serde_json::json!({
            "updated_count": updated_count,
            "invalid_codes": invalid_codes,
            "requires_reindex": requires_reindex,
        }),
    );
    Ok(Json(UpdateSynonymsResponse {
        updated_count,
        invalid_codes,
        requires_reindex,
    }))
}

/// `POST /admin/reindex` — rebuilds the catalog + indexes from disk and publishes the
/// result, bounded by `reindex_timeout_secs`. Single-flight: a reindex already running
/// rejects with 409.
pub async fn reindex(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    if state.reindex.is_in_progress() {
        return Err(ServerError::ReindexInProgress);
    }

    let catalog_path = state.config.catalog_path.clone();
    let embed_cfg = state.config.embed_config();
    let timeout = state.config.reindex_timeout();
    let started = std::time::Instant::now();

    state
        .reindex
        .run_reindex(&state.snapshot, timeout, move || async move {
            snapshot::Snapshot::build_from_catalog_path(&catalog_path, &embed_cfg).await
        })
        .await
        .map_err(|err| match err {
            snapshot::SnapshotError::AlreadyInProgress => ServerError::ReindexInProgress,
            other => ServerError::Snapshot(other),
        })?;
    let duration_ms = started.elapsed().as_millis() as u64;

    let catalog_size = state.snapshot.load().catalog.len();
    log_admin_action(
        &state,
        "reindex",
        serde_json::json!({ "catalog_size": catalog_size, "duration_ms": duration_ms }),
    );
    Ok(Json(serde_json::json!({
        "reindexed": true,
        "vector_count": catalog_size,
        "duration_ms": duration_ms,
    })))
}

fn log_admin_action(state: &ServerState, action: &str, details: serde_json::Value) {
    if let Err(err) = state.admin_audit.log(audit::AdminAuditEntry {
        timestamp: Utc::now(),
        action: action.to_string(),
        user: None,
        details,
    }) {
        tracing::warn!(error = %err, action, "admin_audit_log_failed");
    }
}
