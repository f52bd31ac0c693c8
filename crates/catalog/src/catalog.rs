use std::collections::HashMap;
use std::path::Path;

use crate::error::CatalogError;
use crate::record::OccupationRecord;
use crate::validate::is_valid_code;

/// Counts produced while loading a catalog, for the "skip bad records, don't fail the
/// whole load" contract (spec §4.1): a malformed code or empty title drops the record
/// and increments a counter rather than aborting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub accepted: usize,
    pub skipped_invalid_code: usize,
    pub skipped_empty_title: usize,
    pub skipped_duplicate_code: usize,
}

/// An immutable, ordered collection of occupation records plus the two lookups the
/// query pipeline needs: by code (primary key) and by lowercased title.
///
/// Catalogs are built once per snapshot and never mutated in place; a reindex builds a
/// new `Catalog` and the snapshot manager publishes it atomically.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<OccupationRecord>,
    by_code: HashMap<String, usize>,
    by_title_lc: HashMap<String, usize>,
}

impl Catalog {
    /// Loads and validates a catalog from a JSON file on disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<(Self, LoadReport), CatalogError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::NotFound(path.display().to_string())
            } else {
                CatalogError::Io(e)
            }
        })?;
        Self::load_from_slice(&bytes)
    }

    /// Loads and validates a catalog from an in-memory JSON byte slice.
    pub fn load_from_slice(bytes: &[u8]) -> Result<(Self, LoadReport), CatalogError> {
        let raw: Vec<OccupationRecord> = serde_json::from_slice(bytes)?;
        Ok(Self::from_records(raw))
    }

    /// Builds a catalog from already-deserialized records, applying the same
    /// validation and first-occurrence-wins de-duplication as the file loader.
    pub fn from_records(raw: Vec<OccupationRecord>) -> (Self, LoadReport) {
        let mut records = Vec::with_capacity(raw.len());
        let mut by_code = HashMap::with_capacity(raw.len());
        let mut by_title_lc = HashMap::with_capacity(raw.len());
        let mut report = LoadReport::default();

        for record in raw {
            if !is_valid_code(&record.code) {
                report.skipped_invalid_code += 1;
                tracing::warn!(code = %record.code, "catalog_skip_invalid_code");
                continue;
            }
            if record.title.trim().is_empty() {
                report.skipped_empty_title += 1;
                tracing::warn!(code = %record.code, "catalog_skip_empty_title");
                continue;
            }
            if by_code.contains_key(&record.code) {
                report.skipped_duplicate_code += 1;
                tracing::warn!(code = %record.code, "catalog_skip_duplicate_code");
                continue;
            }

            let ordinal = records.len();
            by_code.insert(record.code.clone(), ordinal);
            by_title_lc
                .entry(record.title.to_lowercase())
                .or_insert(ordinal);
            records.push(record);
            report.accepted += 1;
        }

        (
            Catalog {
                records,
                by_code,
                by_title_lc,
            },
            report,
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in catalog (ordinal) order — the same order the vector index
    /// expects its embeddings in.
    pub fn iter(&self) -> impl Iterator<Item = &OccupationRecord> {
        self.records.iter()
    }

    pub fn by_ordinal(&self, ordinal: usize) -> Option<&OccupationRecord> {
        self.records.get(ordinal)
    }

    pub fn by_code(&self, code: &str) -> Option<&OccupationRecord> {
        self.by_code.get(code).and_then(|&i| self.records.get(i))
    }

    pub fn by_title_lc(&self, title_lc: &str) -> Option<&OccupationRecord> {
        self.by_title_lc
            .get(title_lc)
            .and_then(|&i| self.records.get(i))
    }

    pub fn ordinal_of(&self, code: &str) -> Option<usize> {
        self.by_code.get(code).copied()
    }

    pub fn titles_lc(&self) -> impl Iterator<Item = (&str, &OccupationRecord)> {
        self.by_title_lc
            .iter()
            .map(|(title, &i)| (title.as_str(), &self.records[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OccupationRecord;
    use std::collections::BTreeSet;

    fn record(code: &str, title: &str) -> OccupationRecord {
        OccupationRecord {
            code: code.to_string(),
            title: title.to_string(),
            description: String::new(),
            synonyms: BTreeSet::new(),
            examples: Vec::new(),
            hierarchy: None,
            search_keywords: None,
            searchable_text: None,
        }
    }

    #[test]
    fn accepts_valid_records_and_builds_lookups() {
        let (catalog, report) = Catalog::from_records(vec![
            record("7212.0100", "Welder, Gas"),
            record("2310.0100", "School Teacher"),
        ]);
        assert_eq!(report.accepted, 2);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.by_code("7212.0100").unwrap().title, "Welder, Gas");
        assert_eq!(
            catalog.by_title_lc("school teacher").unwrap().code,
            "2310.0100"
        );
    }

    #[test]
    fn skips_invalid_code_without_failing_load() {
        let (catalog, report) =
            Catalog::from_records(vec![record("bad-code", "Ghost"), record("7212.0100", "Welder")]);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped_invalid_code, 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn skips_empty_title() {
        let (catalog, report) = Catalog::from_records(vec![record("7212.0100", "   ")]);
        assert_eq!(report.accepted, 0);
        assert_eq!(report.skipped_empty_title, 1);
        assert!(catalog.is_empty());
    }

    #[test]
    fn first_occurrence_wins_on_duplicate_code() {
        let (catalog, report) = Catalog::from_records(vec![
            record("7212.0100", "First"),
            record("7212.0100", "Second"),
        ]);
        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped_duplicate_code, 1);
        assert_eq!(catalog.by_code("7212.0100").unwrap().title, "First");
    }

    #[test]
    fn load_from_missing_path_errors() {
        let err = Catalog::load_from_path("/nonexistent/path/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn load_from_invalid_json_errors() {
        let err = Catalog::load_from_slice(b"not json").unwrap_err();
        assert!(matches!(err, CatalogError::InvalidJson(_)));
    }
}
