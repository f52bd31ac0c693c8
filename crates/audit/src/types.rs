use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `search.jsonl` entry — logged once per `/search` request, best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAuditEntry {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub language: String,
    pub k: usize,
    pub low_confidence: bool,
    pub result_count: usize,
    pub top_code: Option<String>,
    pub top_score: Option<f32>,
    pub top_confidence: Option<f32>,
    pub top_k_codes: Vec<String>,
    pub latency_ms: u64,
    pub model_id: String,
    pub version: String,
}

/// One `feedback.jsonl` entry — logged once per `/feedback` submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackAuditEntry {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub selected_code: Option<String>,
    pub results_helpful: bool,
    pub comments: Option<String>,
    pub user_agent: Option<String>,
}

/// One `audit.jsonl` entry — logged for admin-initiated mutations (synonym updates,
/// reindex requests, log purges).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub user: Option<String>,
    pub details: serde_json::Value,
}
