use thiserror::Error;

/// Reasons a log line is rejected. The display text is the key under which
/// rejected lines are tallied, so it must not embed per-line detail such as
/// positions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("invalid JSON")]
    InvalidJson,
    #[error("invalid log entry")]
    InvalidEntry,
    #[error("invalid {kind} entry: {detail}")]
    InvalidPayload { kind: &'static str, detail: String },
    #[error("record before first header")]
    BeforeHeader,
}
