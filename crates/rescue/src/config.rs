use serde::{Deserialize, Serialize};

/// Thresholds and knobs for the query-rescue cascade (Stages A-D).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescueConfig {
    /// Below this top-hit cosine similarity, the result set is flagged low-confidence.
    pub lowconf_topsim: f32,
    /// Below this top-hit softmax confidence, the result set is flagged low-confidence.
    pub lowconf_softmax: f32,
    /// A synonym-expanded variant whose top softmax confidence reaches this short-circuits
    /// the cascade (Stage B success).
    pub synonym_confidence_trigger: f32,
    /// Below this top-hit cosine similarity (or an empty result), Stage D (lexical
    /// fallback) runs and its hits are merged in.
    pub lexical_trigger_topsim: f32,
    pub default_k: usize,
    pub oversample_factor: usize,
    pub fuzzy_title_cutoff: f32,
}

impl Default for RescueConfig {
    fn default() -> Self {
        RescueConfig {
            lowconf_topsim: 0.48,
            lowconf_softmax: 0.55,
            synonym_confidence_trigger: 0.5,
            lexical_trigger_topsim: 0.3,
            default_k: 5,
            oversample_factor: 3,
            fuzzy_title_cutoff: 0.6,
        }
    }
}
