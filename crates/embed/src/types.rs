use serde::{Deserialize, Serialize};

/// The `query: ` / `passage: ` prefix convention the e5 model family expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Query,
    Passage,
}

impl TextKind {
    pub fn prefix(self) -> &'static str {
        match self {
            TextKind::Query => "query: ",
            TextKind::Passage => "passage: ",
        }
    }

    pub fn apply(self, text: &str) -> String {
        format!("{}{}", self.prefix(), text)
    }
}

/// A computed embedding plus the provenance of how it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    pub values: Vec<f32>,
    pub model_name: String,
    pub provider: String,
}

impl Embedding {
    pub fn dim(&self) -> usize {
        self.values.len()
    }
}
