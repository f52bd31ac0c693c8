use std::collections::HashMap;

/// Curated bank of colloquial/occupation-specific synonyms used for Stage B query
/// expansion. Keys are matched as whole-word substrings of the (lowercased) query;
/// each match contributes alternate query variants built by substituting the matched
/// term with each synonym.
#[derive(Debug, Clone)]
pub struct SynonymBank {
    entries: HashMap<String, Vec<String>>,
}

impl Default for SynonymBank {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "tailor".to_string(),
            vec![
                "sewing machine operator".into(),
                "garment maker".into(),
                "seamstress".into(),
            ],
        );
        entries.insert(
            "driver".to_string(),
            vec![
                "vehicle operator".into(),
                "chauffeur".into(),
                "transport operator".into(),
            ],
        );
        entries.insert(
            "teacher".to_string(),
            vec![
                "educator".into(),
                "instructor".into(),
                "tutor".into(),
                "faculty".into(),
            ],
        );
        entries.insert(
            "it professional".to_string(),
            vec![
                "software developer".into(),
                "programmer".into(),
                "coder".into(),
            ],
        );
        entries.insert(
            "healthcare worker".to_string(),
            vec!["medical professional".into(), "health practitioner".into()],
        );
        entries.insert(
            "coolie".to_string(),
            vec!["porter".into(), "loader".into(), "cargo handler".into()],
        );
        entries.insert(
            "mali".to_string(),
            vec!["gardener".into(), "horticulturist".into(), "landscaper".into()],
        );
        SynonymBank { entries }
    }
}

impl SynonymBank {
    pub fn new(entries: HashMap<String, Vec<String>>) -> Self {
        SynonymBank { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds alternate query strings by substituting each matched term in `query`
    /// with its synonyms, one substitution per candidate. The original query is never
    /// included — callers try it first separately.
    pub fn expand(&self, query: &str) -> Vec<String> {
        let query_lc = query.to_lowercase();
        let mut variants = Vec::new();
        for (term, synonyms) in &self.entries {
            if query_lc.contains(term.as_str()) {
                for synonym in synonyms {
                    variants.push(query_lc.replacen(term.as_str(), synonym, 1));
                }
            }
        }
        variants
    }

    /// Returns the replacement terms (not the matched head term itself) for any bank
    /// entry whose head term appears in `query` — used to populate the `alternatives`
    /// response field when the query is low-confidence.
    pub fn alternative_terms(&self, query: &str) -> Vec<String> {
        let query_lc = query.to_lowercase();
        let mut terms = Vec::new();
        for (term, synonyms) in &self.entries {
            if query_lc.contains(term.as_str()) {
                terms.extend(synonyms.iter().cloned());
            }
        }
        terms
    }
}
