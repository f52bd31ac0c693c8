use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use catalog::{Catalog, LoadReport};
use embed::EmbedConfig;
use lexical::KeywordIndex;
use rescue::SynonymBank;
use vecindex::VectorIndex;

use crate::error::SnapshotError;

/// One immutable, internally-consistent view of the searchable catalog: the records,
/// their vector index, their keyword index, and the synonym bank active when this
/// snapshot was built. A request holds one `Arc<Snapshot>` for its whole lifetime, so a
/// reindex that publishes a new snapshot mid-request never tears a response between two
/// inconsistent states.
pub struct Snapshot {
    pub catalog: Catalog,
    pub vector_index: VectorIndex,
    pub keyword_index: KeywordIndex,
    pub synonym_bank: SynonymBank,
    pub load_report: LoadReport,
}

impl Snapshot {
    /// Loads a catalog from `path`, embeds every record's passage text, and builds the
    /// vector + keyword indexes. This is the full reindex build step; it has no side
    /// effects on any currently-published snapshot until the caller publishes it.
    pub async fn build_from_catalog_path(
        path: impl AsRef<Path>,
        embed_cfg: &EmbedConfig,
    ) -> Result<Self, SnapshotError> {
        let (catalog, load_report) = Catalog::load_from_path(path)?;
        Self::build_from_catalog(catalog, load_report, embed_cfg).await
    }

    pub(crate) async fn build_from_catalog(
        catalog: Catalog,
        load_report: LoadReport,
        embed_cfg: &EmbedConfig,
    ) -> Result<Self, SnapshotError> {
        let mut vectors = Vec::with_capacity(catalog.len());
        let mut keyword_index = KeywordIndex::new();

        for (ordinal, record) in catalog.iter().enumerate() {
            let embedding = embed::embed_passage(&record.passage_text(), embed_cfg).await?;
            vectors.push(embedding.values);
            keyword_index.index_record(ordinal, lexical::tokenize(&record.keyword_text()));
        }

        let vector_index = VectorIndex::build_from(vectors)?;

        Ok(Snapshot {
            catalog,
            vector_index,
            keyword_index,
            synonym_bank: SynonymBank::default(),
            load_report,
        })
    }
}

/// Lock-free, atomically-swappable handle to the current [`Snapshot`]. Readers call
/// [`SnapshotHandle::load`] once per request and hold the returned `Arc` for the
/// request's duration; a reindex calls [`SnapshotHandle::publish`] to swap in a new one.
pub struct SnapshotHandle {
    inner: ArcSwap<Snapshot>,
}

impl SnapshotHandle {
    pub fn new(initial: Snapshot) -> Self {
        SnapshotHandle {
            inner: ArcSwap::from_pointee(initial),
        }
    }

    pub fn load(&self) -> Arc<Snapshot> {
        self.inner.load_full()
    }

    pub fn publish(&self, next: Snapshot) {
        self.inner.store(Arc::new(next));
    }
}
