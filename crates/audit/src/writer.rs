use std::path::PathBuf;

use serde_json::Value;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AuditError;

/// A handle to a background JSONL writer task. Logging is deliberately off the
/// critical path: [`AuditWriter::log`] only enqueues the event onto a bounded channel
/// and returns immediately — a dedicated task drains the channel and appends to disk,
/// so a slow or contended filesystem never adds latency to a search or feedback
/// request. This is an explicit deviation from the original's synchronous log writes.
#[derive(Clone)]
pub struct AuditWriter {
    sender: mpsc::Sender<Value>,
}

impl AuditWriter {
    /// Spawns the writer task appending JSONL records to `path`, with a channel of
    /// `capacity` pending events. Returns the writer handle and the task's join handle
    /// (callers typically only need the former; the latter is useful for graceful
    /// shutdown / tests).
    pub fn spawn(path: PathBuf, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<Value>(capacity);

        let handle = tokio::spawn(async move {
            let file = OpenOptions::new().create(true).append(true).open(&path).await;
            let mut file = match file {
                Ok(f) => f,
                Err(err) => {
                    tracing::error!(error = %err, path = %path.display(), "audit_writer_open_failed");
                    return;
                }
            };

            while let Some(event) = receiver.recv().await {
                let line = match serde_json::to_string(&event) {
                    Ok(s) => s,
                    Err(err) => {
                        tracing::warn!(error = %err, "audit_writer_serialize_failed");
                        continue;
                    }
                };
                if let Err(err) = file.write_all(line.as_bytes()).await {
                    tracing::error!(error = %err, "audit_writer_write_failed");
                    continue;
                }
                if let Err(err) = file.write_all(b"\n").await {
                    tracing::error!(error = %err, "audit_writer_write_failed");
                    continue;
                }
                if let Err(err) = file.flush().await {
                    tracing::warn!(error = %err, "audit_writer_flush_failed");
                }
            }

            tracing::info!("audit_writer_shutdown");
        });

        (AuditWriter { sender }, handle)
    }

    /// Enqueues `event` for the writer task to append. Best-effort: a full queue drops
    /// the event rather than blocking the caller, since audit logging must never add
    /// back-pressure to a search or feedback request.
    pub fn log(&self, event: impl serde::Serialize) -> Result<(), AuditError> {
        let value = serde_json::to_value(event)?;
        match self.sender.try_send(value) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!("audit_event_dropped_queue_full");
                Err(AuditError::QueueFull)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(AuditError::WriterGone),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn log_appends_a_jsonl_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.jsonl");
        let (writer, handle) = AuditWriter::spawn(path.clone(), 16);

        writer.log(json!({"query": "welder"})).unwrap();
        drop(writer);
        handle.await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.contains("welder"));
    }

    #[tokio::test]
    async fn full_queue_drops_rather_than_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.jsonl");
        let (writer, _handle) = AuditWriter::spawn(path, 0);
        // Capacity 0: the very first send has nothing to race with the writer task
        // draining it, so allow either outcome but never a hang.
        let result = tokio::time::timeout(Duration::from_millis(200), async {
            writer.log(json!({"query": "x"}))
        })
        .await;
        assert!(result.is_ok());
    }
}
