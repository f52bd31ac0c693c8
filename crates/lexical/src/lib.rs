//! Lexical fallback: inverted keyword index and fuzzy title matching, used when the
//! vector search pipeline's confidence is too low to trust on its own.

pub mod fuzzy;
pub mod keyword;
pub mod titles;

pub use fuzzy::{ratio, ratio_ci};
pub use keyword::{tokenize, KeywordIndex};
pub use titles::{close_matches, TitleMatch};
