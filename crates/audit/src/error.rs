#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize audit event: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("audit writer queue is full; event dropped")]
    QueueFull,
    #[error("audit writer task has shut down")]
    WriterGone,
}
