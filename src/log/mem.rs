//! In-memory append log

use super::errors::{LogError, LogResult};
use super::AppendLog;

/// Append log backed by a byte vector.
///
/// Useful as a test double and for fully in-memory feeds. Follows the
/// same contract as `FileLog`, including the explicit length cache so
/// the lazily-cached-length behavior is exercised the same way.
#[derive(Debug, Default, Clone)]
pub struct MemLog {
    bytes: Vec<u8>,
    cached_len: Option<u64>,
}

impl MemLog {
    /// Creates an empty in-memory log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log pre-populated with `bytes`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            cached_len: None,
        }
    }

    /// Returns the raw contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AppendLog for MemLog {
    fn length(&mut self) -> LogResult<u64> {
        if let Some(len) = self.cached_len {
            return Ok(len);
        }
        let len = self.bytes.len() as u64;
        self.cached_len = Some(len);
        Ok(len)
    }

    fn append(&mut self, bytes: &[u8]) -> LogResult<u64> {
        let start = self.length()?;
        self.bytes.extend_from_slice(bytes);
        self.cached_len = Some(start + bytes.len() as u64);
        Ok(start)
    }

    fn read(&mut self, start: u64, len: u64) -> LogResult<Vec<u8>> {
        let size = self.length()?;
        if start.checked_add(len).map_or(true, |end| end > size) {
            return Err(LogError::OutOfRange { start, len, size });
        }
        Ok(self.bytes[start as usize..(start + len) as usize].to_vec())
    }

    fn truncate(&mut self, len: u64) -> LogResult<()> {
        let size = self.length()?;
        if len > size {
            return Err(LogError::OutOfRange { start: len, len: 0, size });
        }
        self.bytes.truncate(len as usize);
        self.cached_len = Some(len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_read() {
        let mut log = MemLog::new();
        assert_eq!(log.append(b"abc").unwrap(), 0);
        assert_eq!(log.append(b"def").unwrap(), 3);
        assert_eq!(log.read(1, 4).unwrap(), b"bcde");
        assert_eq!(log.length().unwrap(), 6);
    }

    #[test]
    fn test_out_of_range() {
        let mut log = MemLog::from_bytes(b"abcd".to_vec());
        assert!(matches!(log.read(3, 2), Err(LogError::OutOfRange { .. })));
    }

    #[test]
    fn test_truncate() {
        let mut log = MemLog::from_bytes(b"abcdef".to_vec());
        log.truncate(4).unwrap();
        assert_eq!(log.as_bytes(), b"abcd");
        assert_eq!(log.append(b"XY").unwrap(), 4);
        assert!(matches!(log.truncate(7), Err(LogError::OutOfRange { .. })));
    }
}
