//! File-backed append log

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::{LogError, LogResult};
use super::AppendLog;

/// Append-only log over a single file.
///
/// The file is created if absent (an existing zero-length file is the
/// initial state of a fresh log). Writes go through append mode, reads
/// seek on the same handle; the cached length is advanced after every
/// successful append, so appends never re-stat the file.
pub struct FileLog {
    /// Path to the log file
    path: PathBuf,
    /// Underlying file handle, opened read + append
    file: File,
    /// Lazily cached length; `None` until first queried
    cached_len: Option<u64>,
}

impl FileLog {
    /// Opens or creates the log file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `LogError::Io` if the file cannot be created or opened.
    pub fn open(path: &Path) -> LogResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| LogError::io(format!("Failed to open log file: {}", path.display()), e))?;

        debug!(path = %path.display(), "opened append log");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            cached_len: None,
        })
    }

    /// Returns the path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stat_len(&self) -> LogResult<u64> {
        let metadata = self.file.metadata().map_err(|e| {
            LogError::io(
                format!("Failed to stat log file: {}", self.path.display()),
                e,
            )
        })?;
        Ok(metadata.len())
    }
}

impl AppendLog for FileLog {
    fn length(&mut self) -> LogResult<u64> {
        if let Some(len) = self.cached_len {
            return Ok(len);
        }
        let len = self.stat_len()?;
        self.cached_len = Some(len);
        Ok(len)
    }

    fn append(&mut self, bytes: &[u8]) -> LogResult<u64> {
        let start = self.length()?;
        self.file.write_all(bytes).map_err(|e| {
            LogError::io(
                format!("Failed to append to log: {}", self.path.display()),
                e,
            )
        })?;
        self.cached_len = Some(start + bytes.len() as u64);
        Ok(start)
    }

    fn read(&mut self, start: u64, len: u64) -> LogResult<Vec<u8>> {
        let size = self.length()?;
        if start.checked_add(len).map_or(true, |end| end > size) {
            return Err(LogError::OutOfRange { start, len, size });
        }
        self.file.seek(SeekFrom::Start(start)).map_err(|e| {
            LogError::io(format!("Failed to seek log: {}", self.path.display()), e)
        })?;
        let mut buf = vec![0u8; len as usize];
        self.file.read_exact(&mut buf).map_err(|e| {
            LogError::io(format!("Failed to read log: {}", self.path.display()), e)
        })?;
        Ok(buf)
    }

    fn truncate(&mut self, len: u64) -> LogResult<()> {
        let size = self.length()?;
        if len > size {
            return Err(LogError::OutOfRange { start: len, len: 0, size });
        }
        self.file.set_len(len).map_err(|e| {
            LogError::io(
                format!("Failed to truncate log: {}", self.path.display()),
                e,
            )
        })?;
        self.cached_len = Some(len);
        Ok(())
    }
}
