use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::error::SnapshotError;
use crate::snapshot::{Snapshot, SnapshotHandle};

/// Single-flight guard around reindex builds: at most one reindex runs at a time, and
/// a reindex requested while one is already in flight is rejected immediately rather
/// than queued, so admins get an honest "try again" instead of a silent pile-up.
pub struct ReindexCoordinator {
    lock: Mutex<()>,
    in_progress: AtomicBool,
}

impl Default for ReindexCoordinator {
    fn default() -> Self {
        ReindexCoordinator {
            lock: Mutex::new(()),
            in_progress: AtomicBool::new(false),
        }
    }
}

impl ReindexCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Builds a new snapshot via `build` and publishes it to `handle`, bounded by
    /// `timeout_after`. Rejects with [`SnapshotError::AlreadyInProgress`] if another
    /// reindex is currently running.
    pub async fn run_reindex<F, Fut>(
        &self,
        handle: &SnapshotHandle,
        timeout_after: Duration,
        build: F,
    ) -> Result<(), SnapshotError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Snapshot, SnapshotError>>,
    {
        let guard = match self.lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => return Err(SnapshotError::AlreadyInProgress),
        };

        self.in_progress.store(true, Ordering::SeqCst);
        let result = timeout(timeout_after, build()).await;
        self.in_progress.store(false, Ordering::SeqCst);
        drop(guard);

        match result {
            Ok(Ok(snapshot)) => {
                handle.publish(snapshot);
                tracing::info!("reindex_published");
                Ok(())
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "reindex_build_failed");
                Err(err)
            }
            Err(_) => {
                tracing::warn!(?timeout_after, "reindex_timed_out");
                Err(SnapshotError::Timeout(timeout_after))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use catalog::Catalog;
    use embed::EmbedConfig;
    use std::collections::BTreeSet;

    fn cfg() -> EmbedConfig {
        EmbedConfig {
            mode: "stub".into(),
            dim: 8,
            ..EmbedConfig::default()
        }
    }

    async fn seed_snapshot() -> Snapshot {
        let (catalog, report) = Catalog::from_records(vec![catalog::OccupationRecord {
            code: "7212.0100".into(),
            title: "Welder".into(),
            description: String::new(),
            synonyms: BTreeSet::new(),
            examples: Vec::new(),
            hierarchy: None,
            search_keywords: None,
            searchable_text: None,
        }]);
        Snapshot::build_from_catalog(catalog, report, &cfg())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reindex_publishes_a_new_snapshot() {
        let handle = SnapshotHandle::new(seed_snapshot().await);
        let coordinator = ReindexCoordinator::new();

        coordinator
            .run_reindex(&handle, Duration::from_secs(5), || async {
                let (catalog, report) = Catalog::from_records(vec![catalog::OccupationRecord {
                    code: "2310.0100".into(),
                    title: "Teacher".into(),
                    description: String::new(),
                    synonyms: BTreeSet::new(),
                    examples: Vec::new(),
                    hierarchy: None,
                    search_keywords: None,
                    searchable_text: None,
                }]);
                Snapshot::build_from_catalog(catalog, report, &cfg()).await
            })
            .await
            .unwrap();

        assert_eq!(handle.load().catalog.by_code("2310.0100").unwrap().code, "2310.0100");
    }

    #[tokio::test]
    async fn reindex_times_out_for_a_build_that_never_finishes() {
        let handle = SnapshotHandle::new(seed_snapshot().await);
        let coordinator = ReindexCoordinator::new();

        let result = coordinator
            .run_reindex(&handle, Duration::from_millis(10), || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                unreachable!()
            })
            .await;

        assert!(matches!(result, Err(SnapshotError::Timeout(_))));
    }
}
