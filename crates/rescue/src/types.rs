use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Which cascade stage ultimately produced a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Stage A: the original query against the vector index.
    Primary,
    /// Stage B: a synonym-expanded variant reached the confidence trigger.
    SynonymExpansion,
    /// Stage C: the caller-supplied pre-translated query.
    TranslationRescue,
    /// Stage D: keyword/fuzzy lexical fallback, merged with whatever vector hits existed.
    LexicalFallback,
}

/// Optional caller-supplied restriction to a hierarchy branch, applied to vector-search
/// candidates before softmax is computed so the confidence distribution only ever
/// reflects the filtered candidate set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyFilter {
    #[serde(default)]
    pub division_code: Option<String>,
    #[serde(default)]
    pub minor_group_code: Option<String>,
}

impl HierarchyFilter {
    pub fn is_empty(&self) -> bool {
        self.division_code.is_none() && self.minor_group_code.is_none()
    }

    pub fn matches(&self, record: &catalog::OccupationRecord) -> bool {
        let Some(hierarchy) = &record.hierarchy else {
            return self.is_empty();
        };
        if let Some(division) = &self.division_code {
            if &hierarchy.division_code != division {
                return false;
            }
        }
        if let Some(minor_group) = &self.minor_group_code {
            if &hierarchy.minor_group_code != minor_group {
                return false;
            }
        }
        true
    }
}

/// A single ranked search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub code: String,
    pub title: String,
    pub description: String,
    pub score: f32,
    pub confidence: f32,
    pub matched_synonyms: Vec<String>,
}

/// The full outcome of running the query-rescue cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    pub low_confidence: bool,
    pub language: Language,
    pub stage: Stage,
    pub translated: bool,
    pub suggestions: Vec<String>,
    pub alternatives: Vec<String>,
}
