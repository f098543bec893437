//! Replay and reload consistency
//!
//! The index log is the durable source of truth: reopening a feed over
//! the same files must reproduce the index the live feed had at the
//! time of its last append.

use std::fs::OpenOptions;
use std::io::Write;

use hashfeed::digest::{Algo, Hasher, StdHasher};
use hashfeed::feed::{ChangesOptions, ContentFeed, FeedConfig};
use hashfeed::record::Record;
use tempfile::TempDir;

fn open_feed(dir: &TempDir) -> ContentFeed {
    ContentFeed::open(FeedConfig::directory(dir.path())).unwrap()
}

#[test]
fn test_reload_reproduces_index() {
    let dir = TempDir::new().unwrap();

    let (hash1, hash2) = {
        let mut feed = open_feed(&dir);
        let h1 = feed.append(b"test").unwrap();
        let h2 = feed.append(b"asdf").unwrap();
        (h1, h2)
    };

    let mut feed = open_feed(&dir);
    assert_eq!(feed.len(), 2);
    assert_eq!(feed.get(&hash1).unwrap(), b"test");
    assert_eq!(feed.get(&hash2).unwrap(), b"asdf");
}

#[test]
fn test_reload_matches_live_changes() {
    let dir = TempDir::new().unwrap();

    let live_changes = {
        let mut feed = open_feed(&dir);
        feed.append(b"one").unwrap();
        feed.append(b"two").unwrap();
        feed.append(b"three").unwrap();
        feed.changes(&ChangesOptions::default()).unwrap()
    };

    let mut feed = open_feed(&dir);
    let reloaded = feed.changes(&ChangesOptions::default()).unwrap();
    assert_eq!(live_changes, reloaded);
}

#[test]
fn test_reload_continues_sequence() {
    let dir = TempDir::new().unwrap();

    {
        let mut feed = open_feed(&dir);
        feed.append(b"before").unwrap();
    }

    let mut feed = open_feed(&dir);
    feed.append(b"after").unwrap();

    let changes = feed.changes(&ChangesOptions::default()).unwrap();
    let seqs: Vec<u64> = changes.iter().map(|c| c.seq).collect();
    assert_eq!(seqs, vec![0, 1]);
    // Store offsets continue where the first session ended
    assert_eq!(changes[1].offset, 6);
}

#[test]
fn test_reload_keeps_newest_record_for_duplicate_content() {
    let dir = TempDir::new().unwrap();

    let hash = {
        let mut feed = open_feed(&dir);
        feed.append(b"dup").unwrap();
        feed.append(b"dup").unwrap()
    };

    let mut feed = open_feed(&dir);
    assert_eq!(feed.len(), 2);
    assert_eq!(feed.get(&hash).unwrap(), b"dup");

    // Both payload copies remain resident in the store log
    let store_len = std::fs::metadata(dir.path().join("store")).unwrap().len();
    assert_eq!(store_len, 6);
}

#[test]
fn test_truncated_trailing_record_is_tolerated() {
    let dir = TempDir::new().unwrap();

    {
        let mut feed = open_feed(&dir);
        feed.append(b"whole").unwrap();
    }

    // Simulate a torn trailing write in the index log
    {
        let mut file = OpenOptions::new()
            .append(true)
            .open(dir.path().join("feed"))
            .unwrap();
        file.write_all(&[0x12, 0x20, 0xde, 0xad]).unwrap();
    }

    let mut feed = open_feed(&dir);
    assert_eq!(feed.len(), 1, "partial trailing record is end-of-log");
    let changes = feed.changes(&ChangesOptions::default()).unwrap();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].length, 5);
}

#[test]
fn test_append_after_torn_reload_stays_aligned() {
    let dir = TempDir::new().unwrap();

    {
        let mut feed = open_feed(&dir);
        feed.append(b"whole").unwrap();
    }

    // A torn trailing write whose first bytes parse as a valid record
    // header must not shift the frame of later appends
    {
        let mut file = OpenOptions::new()
            .append(true)
            .open(dir.path().join("feed"))
            .unwrap();
        file.write_all(&[0x12, 0x20, 0xde, 0xad]).unwrap();
    }

    let fresh_hash = {
        let mut feed = open_feed(&dir);
        assert_eq!(feed.len(), 1);
        feed.append(b"fresh").unwrap()
    };
    assert_eq!(fresh_hash, StdHasher::default().hash(b"fresh").to_string());

    // The torn bytes are gone: the index log is whole records again
    let record_len = Record::encoded_len(Algo::Sha256);
    let feed_len = std::fs::metadata(dir.path().join("feed")).unwrap().len();
    assert_eq!(feed_len, 2 * record_len);

    let mut feed = open_feed(&dir);
    assert_eq!(feed.len(), 2);
    assert_eq!(feed.get(&fresh_hash).unwrap(), b"fresh");
    let changes = feed.changes(&ChangesOptions::default()).unwrap();
    assert_eq!(changes[1].hash, fresh_hash);
    assert_eq!(changes[1].offset, 5);
    assert_eq!(changes[1].length, 5);
}

#[test]
fn test_fresh_directory_starts_empty() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);
    assert!(feed.is_empty());
    assert!(feed.changes(&ChangesOptions::default()).unwrap().is_empty());
}
