//! occusearch — multilingual semantic search over India's National Classification of
//! Occupations (NCO). This umbrella crate re-exports each workspace member's public
//! surface; `server::start_server` is the usual entrypoint (see `src/bin/server.rs`).

pub use audit;
pub use catalog;
pub use embed;
pub use lexical;
pub use rescue;
pub use server;
pub use snapshot;
pub use vecindex;

pub mod pipeline {
    //! Library-level convenience wrapper around [`rescue::search`] for consumers that
    //! want the query-rescue cascade without standing up the HTTP server — e.g. an
    //! offline evaluation script run against a catalog snapshot.

    pub use rescue::{HierarchyFilter, Language, RescueConfig, RescueError, SearchHit, SearchOutcome};

    /// Runs the full query-rescue cascade against an already-built [`snapshot::Snapshot`].
    pub async fn search(
        snapshot: &snapshot::Snapshot,
        embed_cfg: &embed::EmbedConfig,
        rescue_cfg: &rescue::RescueConfig,
        query: &str,
        translated_query: Option<&str>,
        k: usize,
        filter: &rescue::HierarchyFilter,
    ) -> Result<rescue::SearchOutcome, rescue::RescueError> {
        rescue::search(
            &snapshot.catalog,
            &snapshot.vector_index,
            &snapshot.keyword_index,
            &snapshot.synonym_bank,
            embed_cfg,
            rescue_cfg,
            query,
            translated_query,
            k,
            filter,
        )
        .await
    }
}
