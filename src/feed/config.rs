//! Feed construction configuration
//!
//! Every recognized option is an explicit field with a default,
//! validated when the feed opens. Conflicting combinations (a directory
//! together with an explicit file path) fail fast instead of being
//! silently merged.

use std::fmt;
use std::path::PathBuf;

use crate::digest::{Algo, Hasher, StdHasher};

use super::errors::{FeedError, FeedResult};

/// File name of the index log inside a feed directory.
pub const FEED_FILE: &str = "feed";
/// File name of the store log inside a feed directory.
pub const STORE_FILE: &str = "store";

/// Configuration for opening a `ContentFeed`.
///
/// Either a `directory` (log paths derived as `<dir>/feed` and
/// `<dir>/store`) or both explicit paths must be given, never a mix.
pub struct FeedConfig {
    directory: Option<PathBuf>,
    feed_path: Option<PathBuf>,
    store_path: Option<PathBuf>,
    algo: Algo,
    hasher: Option<Box<dyn Hasher>>,
}

impl FeedConfig {
    /// Config deriving both log paths from a directory.
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(dir.into()),
            feed_path: None,
            store_path: None,
            algo: Algo::default(),
            hasher: None,
        }
    }

    /// Config with explicit index-log and store-log paths.
    pub fn paths(feed: impl Into<PathBuf>, store: impl Into<PathBuf>) -> Self {
        Self {
            directory: None,
            feed_path: Some(feed.into()),
            store_path: Some(store.into()),
            algo: Algo::default(),
            hasher: None,
        }
    }

    /// Selects the digest algorithm (default sha2-256).
    pub fn with_algo(mut self, algo: Algo) -> Self {
        self.algo = algo;
        self
    }

    /// Overrides the hash function entirely; wins over `with_algo`.
    pub fn with_hasher(mut self, hasher: Box<dyn Hasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Overrides the index-log path.
    pub fn with_feed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.feed_path = Some(path.into());
        self
    }

    /// Overrides the store-log path.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = Some(path.into());
        self
    }

    /// Resolves and validates the two log paths.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::InvalidOptions` if `directory` is combined
    /// with an explicit path, or if neither a directory nor both
    /// explicit paths are set.
    pub(crate) fn resolve_paths(&self) -> FeedResult<(PathBuf, PathBuf)> {
        match (&self.directory, &self.feed_path, &self.store_path) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(FeedError::InvalidOptions(
                "directory conflicts with explicit feed/store paths".into(),
            )),
            (Some(dir), None, None) => Ok((dir.join(FEED_FILE), dir.join(STORE_FILE))),
            (None, Some(feed), Some(store)) => Ok((feed.clone(), store.clone())),
            (None, _, _) => Err(FeedError::InvalidOptions(
                "either a directory or both feed and store paths are required".into(),
            )),
        }
    }

    /// Consumes the config, producing the hasher to use.
    pub(crate) fn into_hasher(self) -> Box<dyn Hasher> {
        match self.hasher {
            Some(hasher) => hasher,
            None => Box::new(StdHasher::new(self.algo)),
        }
    }
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("directory", &self.directory)
            .field("feed_path", &self.feed_path)
            .field("store_path", &self.store_path)
            .field("algo", &self.algo)
            .field("hasher", &self.hasher.as_ref().map(|h| h.algo()))
            .finish()
    }
}
