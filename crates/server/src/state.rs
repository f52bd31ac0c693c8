use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// Shared application state, cloned (cheaply — everything inside is `Arc`) into every
/// request handler.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<ServerConfig>,
    pub snapshot: Arc<snapshot::SnapshotHandle>,
    pub reindex: Arc<snapshot::ReindexCoordinator>,
    pub search_audit: audit::AuditWriter,
    pub feedback_audit: audit::AuditWriter,
    pub admin_audit: audit::AuditWriter,
    search_rate_limiter: Arc<DashMap<String, (u32, Instant)>>,
    admin_rate_limiter: Arc<DashMap<String, (u32, Instant)>>,
    pub started_at: Instant,
}

const AUDIT_QUEUE_CAPACITY: usize = 1024;

impl ServerState {
    pub async fn new(config: ServerConfig) -> ServerResult<Self> {
        let embed_cfg = config.embed_config();
        let initial_snapshot =
            snapshot::Snapshot::build_from_catalog_path(&config.catalog_path, &embed_cfg).await?;

        let audit_dir = PathBuf::from(&config.audit_dir);
        std::fs::create_dir_all(&audit_dir).map_err(audit::AuditError::from)?;

        let (search_audit, _) = audit::AuditWriter::spawn(audit_dir.join("search.jsonl"), AUDIT_QUEUE_CAPACITY);
        let (feedback_audit, _) =
            audit::AuditWriter::spawn(audit_dir.join("feedback.jsonl"), AUDIT_QUEUE_CAPACITY);
        let (admin_audit, _) = audit::AuditWriter::spawn(audit_dir.join("audit.jsonl"), AUDIT_QUEUE_CAPACITY);

        Ok(ServerState {
            config: Arc::new(config),
            snapshot: Arc::new(snapshot::SnapshotHandle::new(initial_snapshot)),
            reindex: Arc::new(snapshot::ReindexCoordinator::new()),
            search_audit,
            feedback_audit,
            admin_audit,
            search_rate_limiter: Arc::new(DashMap::new()),
            admin_rate_limiter: Arc::new(DashMap::new()),
            started_at: Instant::now(),
        })
    }

    /// Sliding-window rate check: `limit` requests per 60-second window per client key.
    fn check_rate_limit(limiter: &DashMap<String, (u32, Instant)>, key: &str, limit: u32) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(60);
        let mut entry = limiter.entry(key.to_string()).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) > window {
            *count = 0;
            *window_start = now;
        }

        if *count >= limit {
            return false;
        }
        *count += 1;
        true
    }

    pub fn check_search_rate_limit(&self, key: &str) -> bool {
        Self::check_rate_limit(
            &self.search_rate_limiter,
            key,
            self.config.rate_limit_search_per_minute,
        )
    }

    pub fn check_admin_rate_limit(&self, key: &str) -> bool {
        Self::check_rate_limit(
            &self.admin_rate_limiter,
            key,
            self.config.rate_limit_admin_per_minute,
        )
    }

    /// Whether `token` satisfies the admin gate. With no `admin_token` configured, the
    /// gate is open — intended for local development only, never production.
    pub fn is_admin_authorized(&self, token: Option<&str>) -> bool {
        match &self.config.admin_token {
            None => true,
            Some(expected) => token.map(|t| t == expected).unwrap_or(false),
        }
    }
}
