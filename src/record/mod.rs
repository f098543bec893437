//! Index record codec for hashfeed
//!
//! The index log is a concatenation of fixed-length records, record `i`
//! at byte `i * L`. Each record locates one payload in the store log.
//!
//! # Record Layout
//!
//! ```text
//! [0]              algorithm code byte
//! [1]              digest length byte
//! [2..2+dlen]      digest bytes
//! [2+dlen..+8]     store offset, u64 big-endian
//! [2+dlen+8..+8]   payload length, u64 big-endian
//! ```
//!
//! Big-endian integers keep the encoding order-preserving: encoded
//! records for the same digest sort bytewise by (offset, length). The
//! encoded length L is constant for a given digest algorithm, which is
//! what lets replay and the change scan stride the log without framing.

mod errors;

pub use errors::{RecordError, RecordResult};

use crate::digest::{Algo, Digest};

/// Width of the two u64 fields following the tagged digest.
const FIELDS_LEN: usize = 16;

/// One index-log record: where a payload with a given digest lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Content digest of the payload
    pub digest: Digest,
    /// Byte offset of the payload in the store log
    pub offset: u64,
    /// Payload length in bytes
    pub length: u64,
}

impl Record {
    /// Creates a record.
    pub fn new(digest: Digest, offset: u64, length: u64) -> Self {
        Self {
            digest,
            offset,
            length,
        }
    }

    /// Encoded record length for a given digest algorithm.
    pub fn encoded_len(algo: Algo) -> u64 {
        (Digest::tagged_len(algo) + FIELDS_LEN) as u64
    }

    /// Encodes the record to its fixed-length byte form.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = self.digest.tagged_bytes();
        out.reserve(FIELDS_LEN);
        out.extend_from_slice(&self.offset.to_be_bytes());
        out.extend_from_slice(&self.length.to_be_bytes());
        out
    }

    /// Decodes a record from an exact encoded buffer.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Truncated` if the buffer is shorter than
    /// the digest header requires, `RecordError::TrailingBytes` if it is
    /// longer than one record, and a digest error for a bad tag.
    pub fn decode(buf: &[u8]) -> RecordResult<Self> {
        let digest = Digest::from_tagged_bytes(buf)?;
        let dlen = Digest::tagged_len(digest.algo());
        let expected = dlen + FIELDS_LEN;
        if buf.len() < expected {
            return Err(RecordError::Truncated {
                needed: expected,
                actual: buf.len(),
            });
        }
        if buf.len() > expected {
            return Err(RecordError::TrailingBytes {
                expected,
                actual: buf.len(),
            });
        }
        let offset = u64::from_be_bytes(read_u64(&buf[dlen..dlen + 8]));
        let length = u64::from_be_bytes(read_u64(&buf[dlen + 8..dlen + 16]));
        Ok(Self {
            digest,
            offset,
            length,
        })
    }
}

fn read_u64(buf: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(buf);
    out
}
