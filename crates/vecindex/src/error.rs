#[derive(Debug, thiserror::Error)]
pub enum VecIndexError {
    #[error("embedding dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("vectors and catalog ordinals must be the same length: {vectors} vs {ordinals}")]
    LengthMismatch { vectors: usize, ordinals: usize },
    #[error("vector at ordinal {ordinal} contains a non-finite value")]
    NonFiniteVector { ordinal: usize },
}
