//! Feed error types
//!
//! `FeedError` is the crate's public error: every fallible feed
//! operation returns it, with subsystem errors converted via `#[from]`.

use thiserror::Error;

use crate::digest::DigestError;
use crate::log::LogError;
use crate::record::RecordError;

/// Result type for feed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Digest absent from the in-memory index
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid or conflicting construction/call options
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Append-log failure (I/O or out-of-range read)
    #[error(transparent)]
    Log(#[from] LogError),

    /// Index record failed to decode
    #[error(transparent)]
    Record(#[from] RecordError),

    /// Digest failed to parse
    #[error(transparent)]
    Digest(#[from] DigestError),
}
