use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use serde_json::Value;
use std::collections::VecDeque;

use crate::error::AuditError;

const CHUNK_SIZE: usize = 8192;

/// Reads up to `limit` JSON lines from the end of `path`, most-recent-first, without
/// loading the whole file — reads `CHUNK_SIZE`-byte chunks backward from the end until
/// enough complete lines have been collected or the start of the file is reached.
/// A line that fails to parse as JSON is silently skipped, the same tolerance the
/// original log reader had for a partially-written trailing line.
pub fn read_logs_reverse(path: impl AsRef<Path>, limit: usize) -> Result<Vec<Value>, AuditError> {
    if limit == 0 {
        return Ok(Vec::new());
    }

    let mut file = match File::open(path.as_ref()) {
        Ok(f) => f,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(AuditError::Io(err)),
    };

    let file_len = file.seek(SeekFrom::End(0))?;
    let mut position = file_len;
    let mut leftover: Vec<u8> = Vec::new();
    let mut lines: VecDeque<String> = VecDeque::new();

    while position > 0 && lines.len() < limit {
        let read_size = CHUNK_SIZE.min(position as usize);
        position -= read_size as u64;
        file.seek(SeekFrom::Start(position))?;

        let mut buf = vec![0u8; read_size];
        file.read_exact(&mut buf)?;
        buf.extend_from_slice(&leftover);

        let mut parts: Vec<&[u8]> = buf.split(|&b| b == b'\n').collect();
        // The first element may be an incomplete line continuing into the previous
        // (earlier) chunk; stash it as leftover unless we've hit the start of file.
        leftover = if position > 0 {
            parts.remove(0).to_vec()
        } else {
            Vec::new()
        };

        for part in parts.into_iter().rev() {
            if part.is_empty() {
                continue;
            }
            if let Ok(text) = std::str::from_utf8(part) {
                lines.push_front(text.to_string());
            }
            if lines.len() >= limit {
                break;
            }
        }
    }

    if position == 0 && !leftover.is_empty() {
        if let Ok(text) = std::str::from_utf8(&leftover) {
            lines.push_front(text.to_string());
        }
    }

    while lines.len() > limit {
        lines.pop_front();
    }

    Ok(lines
        .into_iter()
        .rev()
        .filter_map(|line| serde_json::from_str::<Value>(line.trim()).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_lines(path: &Path, lines: &[&str]) {
        let mut f = File::create(path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
    }

    #[test]
    fn reads_most_recent_lines_first() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        write_lines(
            &path,
            &[r#"{"n":1}"#, r#"{"n":2}"#, r#"{"n":3}"#],
        );

        let lines = read_logs_reverse(&path, 2).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["n"], 3);
        assert_eq!(lines[1]["n"], 2);
    }

    #[test]
    fn missing_file_returns_empty() {
        let lines = read_logs_reverse("/nonexistent/audit.jsonl", 5).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn skips_unparseable_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        write_lines(&path, &[r#"{"n":1}"#, "not json", r#"{"n":2}"#]);

        let lines = read_logs_reverse(&path, 10).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn handles_files_larger_than_one_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut f = File::create(&path).unwrap();
        for i in 0..2000 {
            writeln!(f, r#"{{"n":{i}}}"#).unwrap();
        }
        let lines = read_logs_reverse(&path, 3).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["n"], 1999);
        assert_eq!(lines[2]["n"], 1997);
    }
}
