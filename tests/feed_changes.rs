//! Change feed and live subscription behavior
//!
//! Covers the ordered historical scan, the `since` offset, payload
//! attachment, and exactly-once delivery across the historical/live
//! boundary.

use std::cell::RefCell;
use std::rc::Rc;

use hashfeed::digest::{Hasher, StdHasher};
use hashfeed::feed::{Change, ChangesOptions, ContentFeed, FeedConfig, FeedError};
use tempfile::TempDir;

fn open_feed(dir: &TempDir) -> ContentFeed {
    ContentFeed::open(FeedConfig::directory(dir.path())).unwrap()
}

#[test]
fn test_changes_two_append_scenario() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);
    feed.append(b"test").unwrap();
    feed.append(b"asdf").unwrap();

    let hasher = StdHasher::default();
    let expected = vec![
        Change {
            hash: hasher.hash(b"test").to_string(),
            seq: 0,
            offset: 0,
            length: 4,
            data: None,
        },
        Change {
            hash: hasher.hash(b"asdf").to_string(),
            seq: 1,
            offset: 4,
            length: 4,
            data: None,
        },
    ];
    assert_eq!(feed.changes(&ChangesOptions::default()).unwrap(), expected);

    let opts = ChangesOptions {
        include_data: true,
        ..Default::default()
    };
    let with_data = feed.changes(&opts).unwrap();
    assert_eq!(with_data[0].data.as_deref(), Some(&b"test"[..]));
    assert_eq!(with_data[1].data.as_deref(), Some(&b"asdf"[..]));
}

#[test]
fn test_changes_since_returns_suffix() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);
    feed.append(b"zero").unwrap();
    feed.append(b"one").unwrap();
    feed.append(b"two").unwrap();

    let changes = feed.changes(&ChangesOptions::since(1)).unwrap();
    let seqs: Vec<u64> = changes.iter().map(|c| c.seq).collect();
    assert_eq!(seqs, vec![1, 2]);
}

#[test]
fn test_changes_since_past_end_is_empty() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);
    feed.append(b"only").unwrap();

    assert!(feed.changes(&ChangesOptions::since(5)).unwrap().is_empty());
}

#[test]
fn test_streaming_callback_sees_every_record() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);
    feed.append(b"a").unwrap();
    feed.append(b"b").unwrap();
    feed.append(b"c").unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = feed
        .changes_with(&ChangesOptions::default(), move |c| {
            sink.borrow_mut().push(c.seq)
        })
        .unwrap();

    assert!(id.is_none(), "non-live streaming returns no handle");
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
}

#[test]
fn test_live_subscription_delivers_later_appends() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);
    feed.append(b"test").unwrap();

    let seen: Rc<RefCell<Vec<Change>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let opts = ChangesOptions {
        live: true,
        ..Default::default()
    };
    feed.changes_with(&opts, move |c| sink.borrow_mut().push(c.clone()))
        .unwrap()
        .expect("live handle");

    let hash = feed.append(b"asdf").unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2, "one historical + one live, no duplicates");
    assert_eq!(seen[0].seq, 0);
    assert_eq!(
        (&seen[1].hash, seen[1].seq, seen[1].offset, seen[1].length),
        (&hash, 1, 4, 4)
    );
}

#[test]
fn test_live_with_since_skips_history_but_stays_live() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);
    feed.append(b"old0").unwrap();
    feed.append(b"old1").unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let opts = ChangesOptions {
        since: 2,
        live: true,
        ..Default::default()
    };
    feed.changes_with(&opts, move |c| sink.borrow_mut().push(c.seq))
        .unwrap();

    feed.append(b"new").unwrap();
    assert_eq!(*seen.borrow(), vec![2]);
}

#[test]
fn test_unsubscribe_stops_live_delivery() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);

    let seen = Rc::new(RefCell::new(0u32));
    let sink = seen.clone();
    let opts = ChangesOptions {
        live: true,
        ..Default::default()
    };
    let id = feed
        .changes_with(&opts, move |_| *sink.borrow_mut() += 1)
        .unwrap()
        .expect("live handle");

    feed.append(b"delivered").unwrap();
    assert!(feed.unsubscribe(id));
    feed.append(b"dropped").unwrap();

    assert_eq!(*seen.borrow(), 1);
}

#[test]
fn test_batch_changes_reject_live() {
    let dir = TempDir::new().unwrap();
    let mut feed = open_feed(&dir);
    let opts = ChangesOptions {
        live: true,
        ..Default::default()
    };
    assert!(matches!(
        feed.changes(&opts),
        Err(FeedError::InvalidOptions(_))
    ));
}
