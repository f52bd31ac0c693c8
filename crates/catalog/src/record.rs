use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Hierarchical classification attached to an occupation record.
///
/// `division_code` is one digit, `sub_division_code` two, `minor_group_code` three,
/// `unit_group_code` four — each a progressively longer prefix of the record's `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub division_code: String,
    pub division_name: String,
    pub sub_division_code: String,
    pub minor_group_code: String,
    pub unit_group_code: String,
}

/// A single entry in the occupation catalog.
///
/// `code` is the primary key and must match `DDDD.DDDD` (validated at load time, see
/// [`crate::validate::is_valid_code`]). `synonyms` collapses duplicates case-sensitively
/// by being a set rather than a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupationRecord {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub synonyms: BTreeSet<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub hierarchy: Option<Hierarchy>,
    #[serde(default)]
    pub search_keywords: Option<BTreeSet<String>>,
    #[serde(default)]
    pub searchable_text: Option<String>,
}

impl OccupationRecord {
    /// The text embedded into the vector index for this record.
    ///
    /// Uses `searchable_text` verbatim if the catalog precomputed one; otherwise builds
    /// `title + description + "Synonyms: ..." + "Examples: ..."` the way
    /// `embed::passage_text_for` expects, prefixed with `passage: ` by the caller.
    pub fn passage_text(&self) -> String {
        if let Some(text) = &self.searchable_text {
            return text.clone();
        }

        let mut parts = vec![self.title.clone()];
        if !self.description.is_empty() {
            parts.push(self.description.clone());
        }
        if !self.synonyms.is_empty() {
            let joined = self
                .synonyms
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Synonyms: {joined}"));
        }
        if !self.examples.is_empty() {
            let joined = self.examples.join(", ");
            parts.push(format!("Examples: {joined}"));
        }
        parts.join(" ")
    }

    /// The text scanned to build the inverted keyword index: title and synonyms only —
    /// description and examples are embedding signal, not keyword-fallback signal.
    pub fn keyword_text(&self) -> String {
        let mut parts = vec![self.title.clone()];
        parts.extend(self.synonyms.iter().cloned());
        parts.join(" ")
    }
}
