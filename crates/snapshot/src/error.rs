#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),
    #[error("vector index error: {0}")]
    VecIndex(#[from] vecindex::VecIndexError),
    #[error("embedding error: {0}")]
    Embed(#[from] embed::EmbedError),
    #[error("a reindex is already in progress")]
    AlreadyInProgress,
    #[error("reindex timed out after {0:?}")]
    Timeout(std::time::Duration),
}
