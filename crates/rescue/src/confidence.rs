use crate::config::RescueConfig;
use crate::types::SearchHit;

/// `low_confidence ⇔ empty result ∨ top.score < lowconf_topsim ∨ top.confidence < lowconf_softmax`.
pub fn is_low_confidence(hits: &[SearchHit], cfg: &RescueConfig) -> bool {
    match hits.first() {
        None => true,
        Some(top) => top.score < cfg.lowconf_topsim || top.confidence < cfg.lowconf_softmax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(score: f32, confidence: f32) -> SearchHit {
        SearchHit {
            code: "7212.0100".into(),
            title: "Welder".into(),
            description: String::new(),
            score,
            confidence,
            matched_synonyms: Vec::new(),
        }
    }

    #[test]
    fn empty_hits_are_low_confidence() {
        assert!(is_low_confidence(&[], &RescueConfig::default()));
    }

    #[test]
    fn low_topsim_is_low_confidence() {
        assert!(is_low_confidence(&[hit(0.1, 0.9)], &RescueConfig::default()));
    }

    #[test]
    fn low_softmax_is_low_confidence() {
        assert!(is_low_confidence(&[hit(0.9, 0.1)], &RescueConfig::default()));
    }

    #[test]
    fn confident_hit_is_not_low_confidence() {
        assert!(!is_low_confidence(&[hit(0.9, 0.9)], &RescueConfig::default()));
    }
}
