use crate::config::EmbedConfig;
use crate::normalize::l2_normalize_in_place;
use crate::types::Embedding;

/// Deterministic embedding with no model assets: hashes `text` with `fxhash` and
/// derives `cfg.dim` pseudo-random-but-repeatable floats from the hash via a sine
/// transform. Same text, any doc, always yields the same vector — this is what lets
/// search results stay stable across `mode = "stub"` reindexes in dev/CI.
pub fn make_stub_embedding(text: &str, cfg: &EmbedConfig) -> Embedding {
    let h = fxhash::hash64(text.as_bytes());
    let mut values: Vec<f32> = (0..cfg.dim)
        .map(|idx| ((h.rotate_left((idx % 64) as u32) as f32) * 0.0001).sin())
        .collect();

    if cfg.normalize {
        l2_normalize_in_place(&mut values);
    }

    Embedding {
        values,
        model_name: cfg.model_name.clone(),
        provider: "stub".to_string(),
    }
}
