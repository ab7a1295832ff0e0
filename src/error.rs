use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The primary store cannot be reached or the operation could not
    /// complete. Fatal to the operation in progress; nothing is partially
    /// committed.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A row read back from the primary store does not decode into a
    /// feedback record.
    #[error("malformed record in primary store: {0}")]
    MalformedRecord(String),

    /// A mirror write failed after the primary commit succeeded. Non-fatal
    /// to ingestion; that sink permanently misses the entry.
    #[error("{sink} mirror write failed: {source}")]
    MirrorWriteFailed {
        sink: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("satisfaction label is empty")]
    EmptyLabel,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<sqlx::Error> for FeedbackError {
    fn from(err: sqlx::Error) -> Self {
        FeedbackError::StorageUnavailable(err.to_string())
    }
}
