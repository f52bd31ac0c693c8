use std::collections::HashMap;

/// Splits `text` into lowercase word tokens of at least 3 letters — the same cutoff the
/// keyword fallback uses to avoid indexing short, low-signal stopwords like "of"/"in".
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= 3)
        .map(|w| w.to_lowercase())
        .collect()
}

/// An inverted index from word token to the catalog ordinals of records whose title,
/// synonyms, examples, or search keywords contain that word.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    postings: HashMap<String, Vec<usize>>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes one record's searchable words against its catalog ordinal. Callers
    /// typically call this once per record while building a snapshot.
    pub fn index_record(&mut self, ordinal: usize, words: impl IntoIterator<Item = String>) {
        for word in words {
            let postings = self.postings.entry(word).or_default();
            if postings.last() != Some(&ordinal) {
                postings.push(ordinal);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Ranks catalog ordinals by how many distinct query words they match, descending,
    /// with catalog ordinal ascending as the tiebreak. Returns at most `limit` hits.
    pub fn search(&self, query_words: &[String], limit: usize) -> Vec<(usize, usize)> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for word in query_words {
            if let Some(ordinals) = self.postings.get(word) {
                for &ordinal in ordinals {
                    *counts.entry(ordinal).or_insert(0) += 1;
                }
            }
        }

        let mut ranked: Vec<(usize, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}
