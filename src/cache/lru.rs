//! LRU Engine Module
//!
//! Byte-bounded Least Recently Used cache.

use std::collections::HashMap;

use crate::cache::{CacheEntry, Value};

/// Callback invoked with every entry evicted to make room.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

// == LRU Cache ==
/// Byte-bounded LRU cache.
///
/// Entries live in a dense arena and are threaded into a doubly linked
/// recency list:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// The key index maps each key to its arena slot, so lookups, inserts and
/// recency updates are O(1).
///
/// `max_bytes == 0` means unbounded.
pub struct LruCache<V> {
    /// Maximum accounted bytes, 0 = unbounded
    max_bytes: usize,
    /// Σ(key.len() + value.len()) over resident entries
    nbytes: usize,
    /// Key -> arena slot
    index: HashMap<String, usize>,
    /// Entry arena
    entries: Vec<CacheEntry<V>>,
    head: Option<usize>,
    tail: Option<usize>,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: Value> LruCache<V> {
    // == Constructor ==
    /// Creates an empty cache bounded to `max_bytes` (0 = unbounded).
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            nbytes: 0,
            index: HashMap::new(),
            entries: Vec::new(),
            head: None,
            tail: None,
            on_evicted: None,
        }
    }

    /// Creates a cache that reports every eviction to `on_evicted`.
    ///
    /// The callback runs synchronously inside `add`, after the evicted entry
    /// has been fully unlinked.
    pub fn with_eviction_callback<F>(max_bytes: usize, on_evicted: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(Box::new(on_evicted));
        cache
    }

    // == Get ==
    /// Looks up a key and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(self.entries[idx].value.clone())
    }

    // == Add ==
    /// Inserts or replaces a value, then evicts from the LRU end until the
    /// cache fits its budget.
    ///
    /// A single entry larger than the whole budget is kept once everything
    /// else has been evicted.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            let entry = &mut self.entries[idx];
            self.nbytes = self.nbytes + value.len() - entry.value.len();
            entry.value = value;
        } else {
            let entry = CacheEntry::new(key.clone(), value);
            self.nbytes += entry.size();
            let idx = self.entries.len();
            self.entries.push(entry);
            self.index.insert(key, idx);
            self.push_front(idx);
        }

        while self.max_bytes != 0 && self.nbytes > self.max_bytes && self.entries.len() > 1 {
            self.remove_oldest();
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry.
    ///
    /// Returns false if the cache was empty.
    pub fn remove_oldest(&mut self) -> bool {
        let Some(tail) = self.tail else {
            return false;
        };

        let entry = self.detach(tail);
        self.index.remove(&entry.key);
        self.nbytes -= entry.size();

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(entry.key, entry.value);
        }
        true
    }

    // == Contains ==
    /// Checks residency without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Currently accounted bytes.
    pub fn bytes(&self) -> usize {
        self.nbytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Keys from least to most recently used.
    pub fn keys_lru_order(&self) -> Vec<String> {
        let mut keys = Vec::with_capacity(self.entries.len());
        let mut cursor = self.tail;
        while let Some(idx) = cursor {
            keys.push(self.entries[idx].key.clone());
            cursor = self.entries[idx].prev;
        }
        keys
    }

    // == List Plumbing ==
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.entries[idx].prev, self.entries[idx].next);
        match prev {
            Some(p) => self.entries[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.entries[n].prev = prev,
            None => self.tail = prev,
        }
        self.entries[idx].prev = None;
        self.entries[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.entries[idx].prev = None;
        self.entries[idx].next = self.head;
        if let Some(head) = self.head {
            self.entries[head].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    /// Unlinks the entry at `idx` and removes it from the arena.
    ///
    /// The arena stays dense: the last slot moves into `idx`, and its
    /// neighbours and index entry are repointed.
    fn detach(&mut self, idx: usize) -> CacheEntry<V> {
        self.unlink(idx);
        let entry = self.entries.swap_remove(idx);

        if idx < self.entries.len() {
            let (prev, next) = (self.entries[idx].prev, self.entries[idx].next);
            match prev {
                Some(p) => self.entries[p].next = Some(idx),
                None => self.head = Some(idx),
            }
            match next {
                Some(n) => self.entries[n].prev = Some(idx),
                None => self.tail = Some(idx),
            }
            if let Some(slot) = self.index.get_mut(&self.entries[idx].key) {
                *slot = idx;
            }
        }

        entry
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_lru_get() {
        let mut lru = LruCache::new(0);
        lru.add("k1", "1234".to_string());

        assert_eq!(lru.get("k1"), Some("1234".to_string()));
        assert_eq!(lru.get("k2"), None);
    }

    #[test]
    fn test_lru_remove_oldest_on_overflow() {
        let (k1, k2, k3) = ("key1", "key2", "k3");
        let (v1, v2, v3) = ("value1", "value2", "v3");
        let cap = k1.len() + k2.len() + v1.len() + v2.len();

        let mut lru = LruCache::new(cap);
        lru.add(k1, v1.to_string());
        lru.add(k2, v2.to_string());
        lru.add(k3, v3.to_string());

        assert!(lru.get("key1").is_none());
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_lru_on_evicted() {
        let evicted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&evicted);

        let mut lru = LruCache::with_eviction_callback(10, move |key, _value: String| {
            sink.lock().unwrap().push(key);
        });
        lru.add("key1", "123456".to_string());
        lru.add("k2", "k2".to_string());
        lru.add("k3", "k3".to_string());
        lru.add("k4", "k4".to_string());

        assert_eq!(*evicted.lock().unwrap(), vec!["key1", "k2"]);
        assert_eq!(lru.bytes(), 8);
    }

    #[test]
    fn test_lru_update_adjusts_bytes() {
        let mut lru = LruCache::new(0);
        lru.add("key", "abc".to_string());
        assert_eq!(lru.bytes(), 6);

        lru.add("key", "abcdefgh".to_string());
        assert_eq!(lru.bytes(), 11);
        assert_eq!(lru.len(), 1);

        lru.add("key", "a".to_string());
        assert_eq!(lru.bytes(), 4);
        assert_eq!(lru.get("key"), Some("a".to_string()));
    }

    #[test]
    fn test_lru_update_moves_to_front() {
        let mut lru = LruCache::new(11);
        lru.add("a", "11".to_string());
        lru.add("b", "22".to_string());
        lru.add("c", "33".to_string());

        // Overwrite 'a' so 'b' becomes the eviction candidate
        lru.add("a", "44".to_string());
        lru.add("d", "55".to_string());

        assert!(!lru.contains("b"));
        assert_eq!(lru.keys_lru_order(), vec!["c", "a", "d"]);
    }

    #[test]
    fn test_lru_get_moves_to_front() {
        let mut lru = LruCache::new(9);
        lru.add("a", "11".to_string());
        lru.add("b", "22".to_string());
        lru.add("c", "33".to_string());

        lru.get("a");
        lru.add("d", "44".to_string());

        assert!(lru.contains("a"));
        assert!(!lru.contains("b"));
        assert_eq!(lru.keys_lru_order(), vec!["c", "a", "d"]);
    }

    #[test]
    fn test_lru_keeps_single_oversized_entry() {
        let mut lru = LruCache::new(8);
        lru.add("a", "1".to_string());
        lru.add("b", "2".to_string());
        lru.add("big", "0123456789".to_string());

        assert_eq!(lru.len(), 1);
        assert!(lru.contains("big"));
        assert_eq!(lru.bytes(), 13);
    }

    #[test]
    fn test_lru_unbounded_never_evicts() {
        let mut lru = LruCache::new(0);
        for i in 0..1000 {
            lru.add(format!("key{}", i), "x".repeat(100));
        }
        assert_eq!(lru.len(), 1000);
    }

    #[test]
    fn test_lru_remove_oldest_empty() {
        let mut lru: LruCache<String> = LruCache::new(10);
        assert!(!lru.remove_oldest());
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_drain_in_order() {
        let mut lru = LruCache::new(0);
        for key in ["a", "b", "c", "d"] {
            lru.add(key, key.to_string());
        }
        lru.get("b");

        let mut order = Vec::new();
        while let Some(oldest) = lru.keys_lru_order().first().cloned() {
            assert!(lru.remove_oldest());
            order.push(oldest);
        }

        assert_eq!(order, vec!["a", "c", "d", "b"]);
        assert_eq!(lru.bytes(), 0);
    }
}
