use thiserror::Error;

/// Errors produced while loading or validating a catalog file.
///
/// Individual malformed *records* are never surfaced as a [`CatalogError`] — they are
/// skipped and counted (see [`crate::catalog::LoadReport`]). Only failures that make the
/// whole file unusable reach this type.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    NotFound(String),

    #[error("catalog file is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("io error reading catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog is empty after validation")]
    Empty,
}
