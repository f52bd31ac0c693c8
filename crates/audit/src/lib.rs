//! Append-only JSONL audit/feedback logging, off the critical request path.
//!
//! [`AuditWriter`] queues events onto a bounded channel drained by a background task
//! (see `writer.rs` for why this is async rather than a synchronous file write).
//! [`read_logs_reverse`] tails a log file without loading it whole. [`retention`]
//! implements admin log-maintenance operations (purge-all, delete-since).

mod error;
mod reader;
mod retention;
mod types;
mod writer;

pub use error::AuditError;
pub use reader::read_logs_reverse;
pub use retention::{delete_since, purge_all};
pub use types::{AdminAuditEntry, FeedbackAuditEntry, SearchAuditEntry};
pub use writer::AuditWriter;
