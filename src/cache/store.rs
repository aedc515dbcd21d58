//! Main Cache Module
//!
//! Thread-safe wrapper around the LRU engine used by a group.

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{ByteView, CacheStats, LruCache};

struct Inner {
    lru: LruCache<ByteView>,
    stats: CacheStats,
}

// == Main Cache ==
/// The byte-bounded cache owned by a group.
///
/// One exclusive lock guards each operation; every operation is O(1), so
/// the lock is only ever held briefly and never across an await point.
pub struct MainCache {
    inner: Mutex<Inner>,
}

impl MainCache {
    // == Constructor ==
    /// Creates a cache holding at most `cache_bytes` of keys and values
    /// (0 = unbounded).
    pub fn new(cache_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                lru: LruCache::new(cache_bytes),
                stats: CacheStats::new(),
            }),
        }
    }

    // == Get ==
    /// Looks up `key`, recording a hit or a miss.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        let value = inner.lru.get(key);
        match value {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        value
    }

    // == Add ==
    /// Inserts `value`, evicting least recently used entries as needed.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let resident = inner.lru.contains(key);
        let before = inner.lru.len() + usize::from(!resident);

        inner.lru.add(key, value);

        let evicted = before - inner.lru.len();
        if evicted > 0 {
            debug!(key, evicted, "main cache evicted entries");
            inner.stats.record_evictions(evicted as u64);
        }
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.inner.lock().lru.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().lru.is_empty()
    }

    /// Byte budget this cache was created with.
    pub fn max_bytes(&self) -> usize {
        self.inner.lock().lru.max_bytes()
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_occupancy(inner.lru.len(), inner.lru.bytes());
        stats
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_cache_add_and_get() {
        let cache = MainCache::new(0);
        cache.add("Tom", ByteView::copy_from(b"630"));

        assert_eq!(cache.get("Tom").unwrap().to_string(), "630");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_main_cache_stats() {
        let cache = MainCache::new(0);
        cache.add("Tom", ByteView::copy_from(b"630"));
        cache.get("Tom");
        cache.get("Jack");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_bytes, 6);
    }

    #[test]
    fn test_main_cache_counts_evictions() {
        // Room for exactly two "kN"/"vN" entries
        let cache = MainCache::new(8);
        cache.add("k1", ByteView::copy_from(b"v1"));
        cache.add("k2", ByteView::copy_from(b"v2"));
        cache.add("k3", ByteView::copy_from(b"v3"));

        assert!(cache.get("k1").is_none());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_main_cache_overwrite_does_not_count_eviction() {
        let cache = MainCache::new(8);
        cache.add("k1", ByteView::copy_from(b"v1"));
        cache.add("k1", ByteView::copy_from(b"v9"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get("k1").unwrap().to_string(), "v9");
    }
}
