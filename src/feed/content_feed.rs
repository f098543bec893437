//! The `ContentFeed` façade
//!
//! Owns the two append logs, the in-memory digest index, and the
//! live-subscriber registry. Nothing outside this type mutates any of
//! them.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::digest::Hasher;
use crate::log::{AppendLog, FileLog};
use crate::record::Record;

use super::changes::{Change, ChangesOptions, Subscriber, SubscriptionId};
use super::config::FeedConfig;
use super::errors::{FeedError, FeedResult};
use super::replay::{self, IndexEntry};

/// Content-addressed append-only feed.
///
/// `append` writes the payload to the store log, records its digest and
/// location in the index log, and notifies live subscribers; `get`
/// retrieves a payload by digest string; `changes` replays the index
/// log as an ordered change feed.
///
/// Every mutating operation takes `&mut self`, which statically
/// enforces the at-most-one-in-flight-append contract: two concurrent
/// appends on one feed cannot compile. Hosts that share a feed across
/// threads wrap it in a mutex.
///
/// Re-appending identical content is not deduplicated: each append
/// writes a fresh payload copy and a fresh index record, and the new
/// record shadows the older map entry for that digest. `contains` lets
/// callers skip the write themselves.
pub struct ContentFeed<L: AppendLog = FileLog> {
    /// Index log ("feed"): fixed-length records, record i at byte i * L
    feed: L,
    /// Store log: raw payload concatenation, no framing
    store: L,
    /// Content hash function
    hasher: Box<dyn Hasher>,
    /// Fixed encoded record length L for this feed's digest size
    record_len: u64,
    /// digest string -> location of its most recent record
    index: HashMap<String, IndexEntry>,
    /// Number of records in the index log (the next sequence number)
    records: u64,
    /// Live subscribers in registration order
    subscribers: Vec<Subscriber>,
    /// Next subscription handle
    next_subscription: u64,
}

impl ContentFeed<FileLog> {
    /// Opens a file-backed feed.
    ///
    /// Validates the config, creates the log files if absent, and
    /// rebuilds the in-memory index by replaying the index log.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::InvalidOptions` for conflicting or
    /// incomplete path options, and propagates log and decode failures
    /// from the replay.
    pub fn open(config: FeedConfig) -> FeedResult<Self> {
        let (feed_path, store_path) = config.resolve_paths()?;
        let feed = FileLog::open(&feed_path)?;
        let store = FileLog::open(&store_path)?;
        Self::with_logs(feed, store, config.into_hasher())
    }
}

impl<L: AppendLog> ContentFeed<L> {
    /// Builds a feed over pre-constructed logs.
    ///
    /// This is the injection point for alternative storage primitives
    /// (`MemLog`, or any host implementation of `AppendLog`).
    ///
    /// A torn trailing record in the index log (an interrupted write)
    /// is dropped by truncating the log back to the last whole record,
    /// so subsequent appends land on record boundaries.
    pub fn with_logs(mut feed: L, store: L, hasher: Box<dyn Hasher>) -> FeedResult<Self> {
        let record_len = replay::record_len(hasher.as_ref());
        let (index, records) = replay::replay(&mut feed, record_len)?;
        let aligned = records * record_len;
        let physical = feed.length()?;
        if physical > aligned {
            warn!(
                physical,
                aligned, "index log has a torn trailing record; truncating"
            );
            feed.truncate(aligned)?;
        }
        debug!(records, record_len, algo = %hasher.algo(), "opened content feed");
        Ok(Self {
            feed,
            store,
            hasher,
            record_len,
            index,
            records,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Appends a payload and returns its digest string.
    ///
    /// Writes the payload to the store log, then the `(digest, offset,
    /// length)` record to the index log, updates the in-memory index,
    /// and notifies live subscribers synchronously in registration
    /// order. A zero-length payload is valid.
    pub fn append(&mut self, buf: &[u8]) -> FeedResult<String> {
        let offset = self.store.append(buf)?;
        let digest = self.hasher.hash(buf);
        let length = buf.len() as u64;

        let encoded = Record::new(digest.clone(), offset, length).encode();
        let record_offset = self.feed.append(&encoded)?;
        let seq = record_offset / self.record_len;

        let hash = digest.to_string();
        self.index.insert(
            hash.clone(),
            IndexEntry {
                seq,
                offset,
                length,
            },
        );
        self.records = seq + 1;
        trace!(%hash, seq, offset, length, "appended payload");

        let change = Change {
            hash: hash.clone(),
            seq,
            offset,
            length,
            data: None,
        };
        self.notify(&change);

        Ok(hash)
    }

    /// Retrieves the payload for a digest string.
    ///
    /// Reflects the most recently appended record for that digest.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::NotFound` if the digest is absent from the
    /// index.
    pub fn get(&mut self, hash: &str) -> FeedResult<Vec<u8>> {
        let entry = self
            .index
            .get(hash)
            .copied()
            .ok_or_else(|| FeedError::NotFound(hash.to_string()))?;
        Ok(self.store.read(entry.offset, entry.length)?)
    }

    /// Returns whether a payload with this digest string is indexed.
    pub fn contains(&self, hash: &str) -> bool {
        self.index.contains_key(hash)
    }

    /// Number of records in the index log.
    pub fn len(&self) -> u64 {
        self.records
    }

    /// Returns whether the feed holds no records.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Collects historical changes into an ordered batch.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::InvalidOptions` if `opts.live` is set — a
    /// live subscription needs a callback, use [`changes_with`].
    ///
    /// [`changes_with`]: Self::changes_with
    pub fn changes(&mut self, opts: &ChangesOptions) -> FeedResult<Vec<Change>> {
        if opts.live {
            return Err(FeedError::InvalidOptions(
                "live changes require a callback; use changes_with".into(),
            ));
        }
        let mut out = Vec::new();
        self.scan(opts.since, opts.include_data, |change| {
            out.push(change.clone())
        })?;
        Ok(out)
    }

    /// Streams historical changes through `callback`, optionally
    /// staying live.
    ///
    /// Without `opts.live`, this is the streaming form of [`changes`]
    /// and returns `None`. With `opts.live`, the callback is registered
    /// as a subscriber *before* the historical scan, stamped with a
    /// delivery watermark at the current record count; historical
    /// records are then replayed through it and every future append is
    /// forwarded until [`unsubscribe`] is called with the returned
    /// handle. The watermark filter means the scan/subscribe boundary
    /// can neither drop nor double-deliver a record.
    ///
    /// Live-delivered changes never carry `data`, regardless of
    /// `opts.include_data`.
    ///
    /// [`changes`]: Self::changes
    /// [`unsubscribe`]: Self::unsubscribe
    pub fn changes_with<F>(
        &mut self,
        opts: &ChangesOptions,
        callback: F,
    ) -> FeedResult<Option<SubscriptionId>>
    where
        F: FnMut(&Change) + 'static,
    {
        if !opts.live {
            let mut callback = callback;
            self.scan(opts.since, opts.include_data, |change| callback(change))?;
            return Ok(None);
        }

        let id = self.register(Box::new(callback));
        let slot = self.subscribers.len() - 1;

        let end = self.records;
        let mut seq = opts.since.min(end);
        while seq < end {
            let change = self.read_change(seq, opts.include_data)?;
            (self.subscribers[slot].callback)(&change);
            seq += 1;
        }

        Ok(Some(id))
    }

    /// Registers a live subscriber receiving every future append.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Change) + 'static,
    {
        self.register(Box::new(callback))
    }

    /// Removes a subscriber. Returns whether the handle was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subscribers.iter().position(|s| s.id == id) {
            Some(pos) => {
                self.subscribers.remove(pos);
                debug!(id = id.0, "unsubscribed");
                true
            }
            None => false,
        }
    }

    fn register(&mut self, callback: Box<dyn FnMut(&Change)>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            deliver_from: self.records,
            callback,
        });
        debug!(id = id.0, deliver_from = self.records, "subscribed");
        id
    }

    fn notify(&mut self, change: &Change) {
        for subscriber in &mut self.subscribers {
            if change.seq >= subscriber.deliver_from {
                (subscriber.callback)(change);
            }
        }
    }

    /// Scans index records `[since, end)` in order, invoking `f` per
    /// record. A `since` beyond the end yields zero iterations.
    fn scan(
        &mut self,
        since: u64,
        include_data: bool,
        mut f: impl FnMut(&Change),
    ) -> FeedResult<()> {
        let end = self.records;
        let mut seq = since.min(end);
        while seq < end {
            let change = self.read_change(seq, include_data)?;
            f(&change);
            seq += 1;
        }
        Ok(())
    }

    /// Reads and decodes the record at `seq`, attaching payload bytes
    /// when asked.
    fn read_change(&mut self, seq: u64, include_data: bool) -> FeedResult<Change> {
        let buf = self.feed.read(seq * self.record_len, self.record_len)?;
        let record = Record::decode(&buf)?;
        let data = if include_data {
            Some(self.store.read(record.offset, record.length)?)
        } else {
            None
        };
        Ok(Change {
            hash: record.digest.to_string(),
            seq,
            offset: record.offset,
            length: record.length,
            data,
        })
    }
}
