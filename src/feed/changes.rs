//! Change records, scan options, and the live-subscriber registry

use serde::{Deserialize, Serialize};

/// One index-log record as seen by the change feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Digest string of the payload
    pub hash: String,
    /// Zero-based position of the record in the index log
    pub seq: u64,
    /// Payload offset in the store log
    pub offset: u64,
    /// Payload length in bytes
    pub length: u64,
    /// Payload bytes, attached only when a historical scan requests
    /// them. Live-delivered changes never carry data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
}

/// Options for a change scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangesOptions {
    /// First sequence number to deliver (default 0). A value beyond the
    /// current log end yields an empty result, not an error.
    #[serde(default)]
    pub since: u64,

    /// Attach payload bytes to each historical change (default false)
    #[serde(default)]
    pub include_data: bool,

    /// Keep delivering future appends through the callback after the
    /// historical scan (default false). Requires the streaming form;
    /// the batch form rejects it.
    #[serde(default)]
    pub live: bool,
}

impl ChangesOptions {
    /// Options starting from `since` with everything else defaulted.
    pub fn since(since: u64) -> Self {
        Self {
            since,
            ..Self::default()
        }
    }
}

/// Handle to a registered live subscriber.
///
/// Returned by `ContentFeed::subscribe` and live `changes_with` calls;
/// pass it to `ContentFeed::unsubscribe` to stop delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub(crate) u64);

/// A registered live-change callback.
///
/// `deliver_from` is the sequence watermark stamped at registration:
/// events below it were already covered by the registrant's historical
/// scan, so delivery filters on it to rule out duplicates across the
/// scan/subscribe boundary.
pub(crate) struct Subscriber {
    pub(crate) id: SubscriptionId,
    pub(crate) deliver_from: u64,
    pub(crate) callback: Box<dyn FnMut(&Change)>,
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber")
            .field("id", &self.id)
            .field("deliver_from", &self.deliver_from)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let opts = ChangesOptions::default();
        assert_eq!(opts.since, 0);
        assert!(!opts.include_data);
        assert!(!opts.live);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: ChangesOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.since, 0);
        assert!(!opts.live);

        let opts: ChangesOptions = serde_json::from_str(r#"{"since": 3, "live": true}"#).unwrap();
        assert_eq!(opts.since, 3);
        assert!(opts.live);
        assert!(!opts.include_data);
    }

    #[test]
    fn test_change_serializes_without_empty_data() {
        let change = Change {
            hash: "abc".into(),
            seq: 0,
            offset: 0,
            length: 4,
            data: None,
        };
        let json = serde_json::to_string(&change).unwrap();
        assert!(!json.contains("data"));
    }
}
