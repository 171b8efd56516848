//! Persisted key layout.
//!
//! All keys share a namespace prefix so several deployments can use one
//! store instance:
//!
//! ```text
//! {prefix}url:{id}                          record JSON
//! {prefix}hits:{id}:all                     all-time counter
//! {prefix}hits:{id}:{granularity}:{bucket}  time bucket counter
//! {prefix}sources:{id}                      sorted set of sources
//! ```

use chrono::{DateTime, Utc};

use crate::domain::granularity::Granularity;

pub const DEFAULT_PREFIX: &str = "shorty:";

/// Builds store keys under a namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn url_key(&self, id: &str) -> String {
        format!("{}url:{}", self.prefix, id)
    }

    /// Key of the counter for the window of `granularity` containing `at`.
    pub fn counter_key(&self, id: &str, granularity: Granularity, at: DateTime<Utc>) -> String {
        match granularity.bucket_key(at) {
            Some(bucket) => format!("{}hits:{}:{}:{}", self.prefix, id, granularity, bucket),
            None => format!("{}hits:{}:all", self.prefix, id),
        }
    }

    pub fn sources_key(&self, id: &str) -> String {
        format!("{}sources:{}", self.prefix, id)
    }
}

impl Default for KeySpace {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_keys_share_prefix() {
        let keys = KeySpace::new("test:");
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 5, 0).unwrap();

        assert_eq!(keys.url_key("abcde"), "test:url:abcde");
        assert_eq!(keys.sources_key("abcde"), "test:sources:abcde");
        assert_eq!(
            keys.counter_key("abcde", Granularity::All, ts),
            "test:hits:abcde:all"
        );
        assert_eq!(
            keys.counter_key("abcde", Granularity::Hour, ts),
            "test:hits:abcde:hour:2024123123"
        );
        assert_eq!(
            keys.counter_key("abcde", Granularity::Week, ts),
            "test:hits:abcde:week:2025-W01"
        );
    }

    #[test]
    fn test_every_granularity_has_distinct_key() {
        let keys = KeySpace::default();
        let ts = Utc::now();
        let mut seen = std::collections::HashSet::new();

        for g in Granularity::ALL {
            assert!(seen.insert(keys.counter_key("x", g, ts)));
        }
    }
}
