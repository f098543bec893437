//! Startup index reconstruction
//!
//! The index log is the durable source of truth; the in-memory digest
//! map is a cache rebuilt here on every open by a full sequential scan.
//! The scan cost is O(log size / L) and runs once per attach.

use std::collections::HashMap;

use tracing::debug;

use crate::digest::Hasher;
use crate::log::{AppendLog, LogError};
use crate::record::Record;

use super::errors::FeedResult;

/// Location of the most recent record for a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndexEntry {
    /// Sequence number of the record
    pub seq: u64,
    /// Payload offset in the store log
    pub offset: u64,
    /// Payload length in bytes
    pub length: u64,
}

/// Determines the fixed record stride L for a hasher.
///
/// The empty input's digest is deterministic and its encoded record is
/// representative for the digest size, so encoding it once fixes L.
pub(crate) fn record_len(hasher: &dyn Hasher) -> u64 {
    let sample = Record::new(hasher.hash(&[]), 0, 0);
    sample.encode().len() as u64
}

/// Rebuilds the digest map by scanning the index log from byte 0 in
/// strides of `record_len`.
///
/// Later records for the same digest shadow earlier ones. A read past
/// the current end terminates the scan, as does a chunk shorter than one
/// record (a truncated trailing write is treated as end-of-log, not
/// corruption). A record that fails to decode is corruption and
/// propagates.
///
/// Returns the map and the number of records scanned.
pub(crate) fn replay<L: AppendLog>(
    log: &mut L,
    record_len: u64,
) -> FeedResult<(HashMap<String, IndexEntry>, u64)> {
    let mut index = HashMap::new();
    let mut seq = 0u64;

    loop {
        let chunk = match log.read(seq * record_len, record_len) {
            Ok(chunk) => chunk,
            Err(LogError::OutOfRange { .. }) => break,
            Err(e) => return Err(e.into()),
        };
        // Third-party logs may clamp instead of failing at the end
        if (chunk.len() as u64) < record_len {
            break;
        }
        let record = Record::decode(&chunk)?;
        index.insert(
            record.digest.to_string(),
            IndexEntry {
                seq,
                offset: record.offset,
                length: record.length,
            },
        );
        seq += 1;
    }

    debug!(records = seq, entries = index.len(), "replayed index log");
    Ok((index, seq))
}
