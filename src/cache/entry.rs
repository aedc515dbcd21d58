//! Cache Entry Module
//!
//! Defines the sized value capability and the linked entry stored by the LRU engine.

// == Value Trait ==
/// Anything stored in the LRU engine must report its size in bytes.
///
/// The size feeds the engine's byte accounting together with the key length.
pub trait Value: Clone {
    /// Number of bytes this value occupies.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

// == Cache Entry ==
/// A resident key/value pair linked into the recency list.
///
/// `prev` points towards the most recently used end, `next` towards the
/// least recently used end. Both are slot indices into the engine's arena.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
}

impl<V: Value> CacheEntry<V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: String, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }

    // == Size ==
    /// Accounted size of this entry: key bytes plus value bytes.
    pub fn size(&self) -> usize {
        self.key.len() + self.value.len()
    }
}
