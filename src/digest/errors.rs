//! Digest error types

use thiserror::Error;

/// Result type for digest operations
pub type DigestResult<T> = Result<T, DigestError>;

/// Digest errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DigestError {
    /// Algorithm code byte not recognized
    #[error("Unknown digest algorithm code: 0x{0:02x}")]
    UnknownAlgo(u8),

    /// Digest byte length does not match the algorithm's digest size
    #[error("Digest length mismatch: algorithm {algo} expects {expected} bytes, got {actual}")]
    LengthMismatch {
        algo: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Tagged digest shorter than its own header claims
    #[error("Truncated digest: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    /// String form is not valid base64
    #[error("Invalid digest encoding: {0}")]
    InvalidEncoding(String),
}
