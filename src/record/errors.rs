//! Record codec error types

use thiserror::Error;

use crate::digest::DigestError;

/// Result type for record codec operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Record codec errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Buffer shorter than one encoded record
    #[error("Truncated record: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    /// Buffer longer than one encoded record
    #[error("Record has trailing bytes: expected {expected}, got {actual}")]
    TrailingBytes { expected: usize, actual: usize },

    /// Digest tag could not be decoded
    #[error(transparent)]
    Digest(#[from] DigestError),
}
