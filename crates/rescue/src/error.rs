#[derive(Debug, thiserror::Error)]
pub enum RescueError {
    #[error("embedding failed: {0}")]
    Embed(#[from] embed::EmbedError),
    #[error("vector index error: {0}")]
    VecIndex(#[from] vecindex::VecIndexError),
    #[error("empty query")]
    EmptyQuery,
}
