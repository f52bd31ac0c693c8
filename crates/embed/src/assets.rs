use std::path::Path;

use crate::config::EmbedConfig;
use crate::error::EmbedError;

/// Checks that the configured model and tokenizer files exist on disk.
///
/// Does not download: `model_url`/`tokenizer_url` are accepted in [`EmbedConfig`] for
/// forward compatibility with an operator-run asset-fetch step, but this provider never
/// performs network fetches of model weights itself — only missing-asset detection, so
/// the caller can decide to fall back to the stub provider.
pub fn verify_assets(cfg: &EmbedConfig) -> Result<(), EmbedError> {
    if !Path::new(&cfg.model_path).is_file() {
        return Err(EmbedError::ModelNotFound(cfg.model_path.clone()));
    }
    match &cfg.tokenizer_path {
        Some(path) if Path::new(path).is_file() => Ok(()),
        Some(path) => Err(EmbedError::TokenizerMissing(path.clone())),
        None => Err(EmbedError::TokenizerMissing(
            "tokenizer_path not configured".to_string(),
        )),
    }
}

/// Whether a failed asset resolution should fall back to the stub provider rather than
/// propagate. Missing files are the common "model not downloaded yet" case; a malformed
/// config is a caller bug and should surface instead.
pub fn should_fallback_to_stub(err: &EmbedError) -> bool {
    matches!(
        err,
        EmbedError::ModelNotFound(_) | EmbedError::TokenizerMissing(_) | EmbedError::Io(_)
    )
}
