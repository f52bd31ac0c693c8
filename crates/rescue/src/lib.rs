//! Multi-stage query-rescue search pipeline.
//!
//! Stage A runs the query straight through the vector index. If confidence is low,
//! Stage B retries synonym-expanded variants, Stage C retries a caller-supplied
//! translation, and Stage D merges in a lexical (keyword + fuzzy-title) fallback.
//! Each stage only runs if the previous one didn't already produce a confident result.

pub mod config;
pub mod confidence;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod synonyms;
pub mod types;

pub use config::RescueConfig;
pub use error::RescueError;
pub use language::{detect_language, Language};
pub use pipeline::search;
pub use synonyms::SynonymBank;
pub use types::{HierarchyFilter, SearchHit, SearchOutcome, Stage};
