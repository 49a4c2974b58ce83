use crate::models::Video;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    payload: V,
    stored_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.stored_at) >= ttl
    }
}

/// In-memory cache whose entries expire a fixed time after they were stored
#[derive(Clone)]
pub struct ResultCache<V> {
    entries: Arc<DashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

/// Cache of fetched channel uploads
pub type VideoCache = ResultCache<Vec<Video>>;

impl<V: Clone> ResultCache<V> {
    /// Create an empty cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Get a value by key, evicting it if it has expired
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now, self.ttl) {
                return Some(entry.payload.clone());
            }
        }

        self.entries
            .remove_if(key, |_, entry| entry.is_expired(now, self.ttl));
        None
    }

    /// Store a value, replacing any previous entry for the key
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    pub(crate) fn set_at(&self, key: impl Into<String>, value: V, now: Instant) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                payload: value,
                stored_at: now,
            },
        );
    }

    /// Delete a value from the cache
    pub fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop all expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub(crate) fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.is_expired(now, self.ttl));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl VideoCache {
    /// Generate cache key for a channel's uploads
    pub fn videos_key(handle: &str, limit: usize) -> String {
        format!("{}:{}:{}", Self::KEY_PREFIX, handle.to_lowercase(), limit)
    }

    const KEY_PREFIX: &'static str = "videos";
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(3600);

    #[test]
    fn test_videos_key_generation() {
        assert_eq!(VideoCache::videos_key("ExampleChannel", 50), "videos:examplechannel:50");
        assert_eq!(VideoCache::videos_key("abc", 1), "videos:abc:1");
    }

    #[test]
    fn test_get_missing_key() {
        let cache: ResultCache<String> = ResultCache::new(TTL);
        assert!(cache.get("nope").is_none());
    }

    #[test]
    fn test_value_returned_within_ttl() {
        let cache = ResultCache::new(TTL);
        let start = Instant::now();
        cache.set_at("k", vec![1, 2, 3], start);

        assert_eq!(cache.get_at("k", start), Some(vec![1, 2, 3]));
        assert_eq!(
            cache.get_at("k", start + TTL - Duration::from_millis(1)),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_value_absent_and_evicted_at_ttl() {
        let cache = ResultCache::new(TTL);
        let start = Instant::now();
        cache.set_at("k", "payload".to_string(), start);

        assert!(cache.get_at("k", start + TTL).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_set_replaces_and_refreshes() {
        let cache = ResultCache::new(TTL);
        let start = Instant::now();
        cache.set_at("k", 1, start);
        cache.set_at("k", 2, start + Duration::from_secs(3000));

        assert_eq!(cache.get_at("k", start + Duration::from_secs(4000)), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_purge_expired() {
        let cache = ResultCache::new(TTL);
        let start = Instant::now();
        cache.set_at("old", 1, start);
        cache.set_at("fresh", 2, start + Duration::from_secs(1800));

        let removed = cache.purge_expired_at(start + TTL);
        assert_eq!(removed, 1);
        assert_eq!(cache.get_at("fresh", start + TTL), Some(2));
    }

    #[test]
    fn test_remove() {
        let cache = ResultCache::new(TTL);
        cache.set("k", 1);
        cache.remove("k");
        assert!(cache.is_empty());
    }
}
