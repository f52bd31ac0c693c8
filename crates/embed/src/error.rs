use std::io;

/// Errors surfaced by the embedding provider.
///
/// `Io`/`Download` only occur while resolving on-disk model assets for `mode = "onnx"`;
/// the dispatcher in [`crate::embed_text`] treats most of those as recoverable and falls
/// back to the stub provider rather than propagating them.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("model file not found at {0}")]
    ModelNotFound(String),
    #[error("tokenizer file not found at {0}")]
    TokenizerMissing(String),
    #[error("invalid embed config: {0}")]
    InvalidConfig(String),
    #[error("failed to download model asset: {0}")]
    Download(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("embedding api request failed: {0}")]
    Api(String),
}

impl Clone for EmbedError {
    fn clone(&self) -> Self {
        match self {
            EmbedError::ModelNotFound(s) => EmbedError::ModelNotFound(s.clone()),
            EmbedError::TokenizerMissing(s) => EmbedError::TokenizerMissing(s.clone()),
            EmbedError::InvalidConfig(s) => EmbedError::InvalidConfig(s.clone()),
            EmbedError::Download(s) => EmbedError::Download(s.clone()),
            EmbedError::Io(e) => EmbedError::Inference(format!("io error: {e}")),
            EmbedError::Inference(s) => EmbedError::Inference(s.clone()),
            EmbedError::Api(s) => EmbedError::Api(s.clone()),
        }
    }
}
