//! Text embedding provider: `query: `/`passage: `-prefixed text in, a unit-norm vector
//! out. Three provider modes (`stub`, `onnx`, `api`), selected by [`config::EmbedConfig::mode`].
//!
//! Asset resolution failures in `mode = "onnx"` (missing model or tokenizer file) fall
//! back to the deterministic stub rather than failing the caller — the search service
//! should still come up and answer queries, just without real semantics, until model
//! assets are in place.

pub mod api;
pub mod assets;
pub mod config;
pub mod error;
pub mod normalize;
pub mod onnx;
pub mod stub;
pub mod types;

pub use config::EmbedConfig;
pub use error::EmbedError;
pub use types::{Embedding, TextKind};

/// Embeds a single piece of already-`kind`-tagged text according to `cfg.mode`.
pub async fn embed_text(
    text: &str,
    kind: TextKind,
    cfg: &EmbedConfig,
) -> Result<Embedding, EmbedError> {
    let prefixed = kind.apply(text);

    match cfg.mode.as_str() {
        "stub" => return Ok(stub::make_stub_embedding(&prefixed, cfg)),
        "api" => return api::embed_via_api(&prefixed, cfg).await,
        "onnx" => {}
        other => {
            return Err(EmbedError::InvalidConfig(format!(
                "unknown embed mode '{other}'"
            )))
        }
    }

    if let Err(err) = assets::verify_assets(cfg) {
        if assets::should_fallback_to_stub(&err) {
            tracing::warn!(error = %err, "embed_onnx_assets_missing_falling_back_to_stub");
            return Ok(stub::make_stub_embedding(&prefixed, cfg));
        }
        return Err(err);
    }

    let cfg = cfg.clone();
    let text_owned = prefixed.clone();
    // ONNX Runtime's session is blocking/CPU-bound; run it on a blocking thread so it
    // doesn't stall the async executor driving concurrent search requests.
    tokio::task::spawn_blocking(move || onnx::embed_via_onnx(&text_owned, &cfg))
        .await
        .map_err(|e| EmbedError::Inference(format!("onnx task join error: {e}")))?
}

/// Convenience wrapper for embedding a search query.
pub async fn embed_query(text: &str, cfg: &EmbedConfig) -> Result<Embedding, EmbedError> {
    embed_text(text, TextKind::Query, cfg).await
}

/// Convenience wrapper for embedding a catalog record's passage text.
pub async fn embed_passage(text: &str, cfg: &EmbedConfig) -> Result<Embedding, EmbedError> {
    embed_text(text, TextKind::Passage, cfg).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_cfg() -> EmbedConfig {
        EmbedConfig {
            mode: "stub".into(),
            dim: 64,
            ..EmbedConfig::default()
        }
    }

    #[tokio::test]
    async fn stub_mode_is_deterministic_and_prefixed_by_kind() {
        let a = embed_query("welder", &stub_cfg()).await.unwrap();
        let b = embed_passage("welder", &stub_cfg()).await.unwrap();
        // Different prefixes ("query: " vs "passage: ") must hash differently.
        assert_ne!(a.values, b.values);
        assert_eq!(a.dim(), 64);
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let cfg = EmbedConfig {
            mode: "quantum".into(),
            ..EmbedConfig::default()
        };
        let err = embed_query("welder", &cfg).await.unwrap_err();
        assert!(matches!(err, EmbedError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn onnx_mode_falls_back_to_stub_when_assets_missing() {
        let cfg = EmbedConfig {
            mode: "onnx".into(),
            model_path: "/nonexistent/model.onnx".into(),
            dim: 64,
            ..EmbedConfig::default()
        };
        let embedding = embed_query("welder", &cfg).await.unwrap();
        assert_eq!(embedding.provider, "stub");
    }
}
