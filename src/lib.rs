//! hashfeed - content-addressed append-only feed storage
//!
//! Payloads are appended to a store log and indexed by content digest
//! in a parallel fixed-length-record index log; the index log doubles
//! as an ordered change feed with live subscriptions.

pub mod digest;
pub mod feed;
pub mod log;
pub mod record;
