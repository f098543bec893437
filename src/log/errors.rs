//! Append-log error types

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Result type for append-log operations
pub type LogResult<T> = Result<T, LogError>;

/// Append-log errors
#[derive(Debug, Clone, Error)]
pub enum LogError {
    /// Requested range exceeds the current log length
    #[error("Read out of range: [{start}, {start}+{len}) exceeds log length {size}")]
    OutOfRange { start: u64, len: u64, size: u64 },

    /// Underlying storage failure
    #[error("Log I/O failure: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: Arc<io::Error>,
    },
}

impl LogError {
    /// Wraps an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source: Arc::new(source),
        }
    }
}
