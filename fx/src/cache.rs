//! Expiring in-memory cache with a single shared TTL.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::borrow::Borrow;
use std::hash::Hash;

/// Cached value with its write time.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Utc::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        Utc::now().signed_duration_since(self.stored_at) < ttl
    }
}

/// Key-value store whose entries go stale `ttl` after they were written.
///
/// Expiry is checked on read only. Stale entries stay in memory until the
/// same key is written again; `get` reports them as misses.
pub struct ExpiringCache<K, V> {
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Get a value if it was written less than `ttl` ago.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(self.ttl) {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Store a value, replacing any previous entry for `key`.
    pub fn set(&self, key: K, value: V) {
        self.entries.insert(key, CacheEntry::new(value));
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was ever stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    #[test]
    fn test_cache_set_and_get() {
        let cache = ExpiringCache::new(Duration::seconds(1));
        cache.set("testKey".to_string(), 42);

        assert_eq!(cache.get("testKey"), Some(42));
    }

    #[test]
    fn test_cache_miss() {
        let cache: ExpiringCache<String, i32> = ExpiringCache::new(Duration::seconds(1));

        assert!(cache.get("nonExistentKey").is_none());
    }

    #[test]
    fn test_cache_expiry() {
        let cache = ExpiringCache::new(Duration::milliseconds(50));
        cache.set("testKey".to_string(), 42);

        assert_eq!(cache.get("testKey"), Some(42));

        sleep(StdDuration::from_millis(60));

        assert!(cache.get("testKey").is_none());
        // Stale entries are not purged by reads
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites_and_refreshes() {
        let cache = ExpiringCache::new(Duration::milliseconds(50));
        cache.set("k".to_string(), 1);

        sleep(StdDuration::from_millis(60));
        assert!(cache.get("k").is_none());

        cache.set("k".to_string(), 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = ExpiringCache::new(Duration::zero());
        cache.set("k".to_string(), 1);

        assert!(cache.get("k").is_none());
    }

    proptest! {
        #[test]
        fn prop_get_after_set_returns_value(key in "[A-Z]{3}", value in any::<i64>()) {
            let cache = ExpiringCache::new(Duration::minutes(10));
            cache.set(key.clone(), value);
            prop_assert_eq!(cache.get(key.as_str()), Some(value));
        }

        #[test]
        fn prop_unset_key_misses(stored in "[A-Z]{3}", probe in "[a-z]{3}") {
            let cache = ExpiringCache::new(Duration::minutes(10));
            cache.set(stored, 1u8);
            prop_assert!(cache.get(probe.as_str()).is_none());
        }
    }
}
