//! Occupation catalog: record model, JSON loading, and lookups.
//!
//! This crate is the first stage of the search pipeline: it turns a catalog JSON file
//! into a validated, ordered collection of [`OccupationRecord`]s with `by_code` and
//! `by_title_lc` lookups. It is pure and side-effect free beyond the initial file read —
//! no embedding, no indexing, no network calls.
//!
//! # Contract
//!
//! Loading fails only if the file is missing or syntactically invalid JSON. Individual
//! bad records (malformed code, empty title, duplicate code) are skipped and counted in
//! the returned [`LoadReport`] rather than failing the whole load.

mod catalog;
mod error;
mod record;
mod validate;

pub use crate::catalog::{Catalog, LoadReport};
pub use crate::error::CatalogError;
pub use crate::record::{Hierarchy, OccupationRecord};
pub use crate::validate::{hierarchy_prefixes, is_valid_code};
