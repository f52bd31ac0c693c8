use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::AuditError;

/// Truncates the log file to empty, keeping the file itself (and its permissions) in
/// place rather than removing it.
pub fn purge_all(path: impl AsRef<Path>) -> Result<(), AuditError> {
    File::create(path.as_ref())?;
    Ok(())
}

/// Rewrites the log file keeping only entries whose `timestamp` field parses as an
/// RFC 3339 timestamp strictly before `cutoff`; entries at or after `cutoff`, and any
/// entry missing or failing to parse a `timestamp` field, are dropped. Returns the
/// number of lines removed. The rewrite is atomic: survivors are written to a temp
/// file in the same directory, then renamed over the original.
pub fn delete_since(path: impl AsRef<Path>, cutoff: DateTime<Utc>) -> Result<usize, AuditError> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(AuditError::Io(err)),
    };
    let reader = BufReader::new(file);

    let mut survivors = Vec::new();
    let mut removed = 0usize;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let keep = serde_json::from_str::<serde_json::Value>(&line)
            .ok()
            .and_then(|v| v.get("timestamp").and_then(|t| t.as_str()).map(str::to_string))
            .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
            .map(|ts| ts.with_timezone(&Utc) < cutoff)
            .unwrap_or(false);

        if keep {
            survivors.push(line);
        } else {
            removed += 1;
        }
    }

    let tmp_path = path.with_extension("jsonl.tmp");
    let mut tmp = File::create(&tmp_path)?;
    for line in &survivors {
        writeln!(tmp, "{line}")?;
    }
    tmp.flush()?;
    fs::rename(&tmp_path, path)?;

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn purge_all_empties_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        std::fs::write(&path, "{\"n\":1}\n").unwrap();
        purge_all(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn delete_since_keeps_only_entries_before_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut f = File::create(&path).unwrap();
        writeln!(f, r#"{{"timestamp":"2026-01-01T00:00:00Z","n":1}}"#).unwrap();
        writeln!(f, r#"{{"timestamp":"2026-06-01T00:00:00Z","n":2}}"#).unwrap();
        drop(f);

        let cutoff = DateTime::parse_from_rfc3339("2026-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let removed = delete_since(&path, cutoff).unwrap();
        assert_eq!(removed, 1);

        let remaining = std::fs::read_to_string(&path).unwrap();
        assert!(remaining.contains("\"n\":1"));
        assert!(!remaining.contains("\"n\":2"));
    }

    #[test]
    fn delete_since_on_missing_file_is_a_noop() {
        let removed = delete_since("/nonexistent/audit.jsonl", Utc::now()).unwrap();
        assert_eq!(removed, 0);
    }
}
