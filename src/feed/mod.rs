//! Content feed subsystem for hashfeed
//!
//! The façade composing the digest, record, and log layers: append
//! immutable byte buffers, retrieve them by digest, and follow the
//! index log as a change feed with optional live subscriptions.
//!
//! # Design Principles
//!
//! - The feed exclusively owns both logs, the in-memory index, and the
//!   subscriber registry
//! - The index log is the durable source of truth; the in-memory map is
//!   a cache rebuilt by replay on every open
//! - Single-writer appends, enforced by `&mut self`
//! - No dedup: re-appended content shadows the prior index entry while
//!   both payload copies stay in the store log

mod changes;
mod config;
mod content_feed;
mod errors;
mod replay;

pub use changes::{Change, ChangesOptions, SubscriptionId};
pub use config::{FeedConfig, FEED_FILE, STORE_FILE};
pub use content_feed::ContentFeed;
pub use errors::{FeedError, FeedResult};
