//! Append-only byte log primitive for hashfeed
//!
//! A feed owns two independent logs: the index log of fixed-length
//! records and the store log of raw payload bytes. Both speak the same
//! small interface: cached length, append returning the pre-write
//! offset, and exact-range reads.
//!
//! # Design Principles
//!
//! - Append-only: bytes are never overwritten or moved
//! - Single writer: mutating calls take `&mut self`; the borrow checker
//!   rules out two in-flight appends on one log
//! - Lazily cached length: the first `length` call queries the
//!   underlying storage, later calls return the cache. Length changes
//!   made by another process or handle are not observed after the first
//!   call — a documented limitation of the single-writer contract, not
//!   something the log tries to detect.

mod errors;
mod file;
mod mem;

pub use errors::{LogError, LogResult};
pub use file::FileLog;
pub use mem::MemLog;

/// Byte-addressable append-only storage.
///
/// `ContentFeed` is generic over this trait, so hosts can substitute
/// their own storage primitive (`MemLog` ships in-crate for tests and
/// embedding).
pub trait AppendLog {
    /// Returns the current byte length of the log.
    ///
    /// The first call may query the underlying storage; the result is
    /// cached and only invalidated by this log's own appends.
    fn length(&mut self) -> LogResult<u64>;

    /// Appends `bytes` at the end of the log and returns the byte
    /// offset the write started at.
    fn append(&mut self, bytes: &[u8]) -> LogResult<u64>;

    /// Reads exactly `len` bytes starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns `LogError::OutOfRange` if `[start, start + len)` exceeds
    /// the current log length.
    fn read(&mut self, start: u64, len: u64) -> LogResult<Vec<u8>>;

    /// Truncates the log to `len` bytes.
    ///
    /// The feed uses this at open to drop a torn trailing index record,
    /// keeping the log a whole multiple of the record stride so later
    /// appends stay frame-aligned.
    ///
    /// # Errors
    ///
    /// Returns `LogError::OutOfRange` if `len` exceeds the current log
    /// length; truncation only shrinks.
    fn truncate(&mut self, len: u64) -> LogResult<()>;
}
