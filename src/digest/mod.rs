//! Content digest subsystem for hashfeed
//!
//! Every payload appended to a feed is identified by the digest of its
//! content. Digests are self-describing: the raw hash bytes carry a
//! one-byte algorithm code and a one-byte length, so a digest read back
//! from disk identifies its own algorithm.
//!
//! # Design Principles
//!
//! - Deterministic: identical content always produces identical digests
//! - Self-describing: tagged bytes decode without external context
//! - Stable string form: the canonical string is the external handle
//!   and the in-memory index key

mod errors;
mod hasher;

pub use errors::{DigestError, DigestResult};
pub use hasher::{Algo, Digest, Hasher, StdHasher};
