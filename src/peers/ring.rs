//! Consistent Hash Ring
//!
//! Maps keys to owning nodes through replicated virtual nodes.

use std::collections::HashMap;

/// Hash function used to place virtual nodes and keys on the ring.
pub type HashFn = fn(&[u8]) -> u32;

// == Hash Ring ==
/// Consistent-hash ring.
///
/// Each real node contributes `replicas` virtual nodes named
/// `"{i}{node}"` for `i` in `0..replicas`. A key belongs to the first
/// virtual node clockwise from the key's hash.
///
/// Nodes are never removed; a changed peer set means building a new ring.
#[derive(Debug, Clone)]
pub struct HashRing {
    hash: HashFn,
    replicas: usize,
    /// Sorted virtual node hashes
    keys: Vec<u32>,
    /// Virtual node hash -> real node
    nodes: HashMap<u32, String>,
}

impl HashRing {
    // == Constructor ==
    /// Creates an empty ring using CRC-32 (IEEE).
    pub fn new(replicas: usize) -> Self {
        Self::with_hasher(replicas, crc32fast::hash)
    }

    /// Creates an empty ring with a custom hash function.
    ///
    /// `replicas` is clamped to at least 1.
    pub fn with_hasher(replicas: usize, hash: HashFn) -> Self {
        Self {
            hash,
            replicas: replicas.max(1),
            keys: Vec::new(),
            nodes: HashMap::new(),
        }
    }

    // == Add ==
    /// Places `replicas` virtual nodes for every given node, then re-sorts.
    ///
    /// Adding the same node twice adds its virtual nodes twice.
    pub fn add<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{}{}", i, node).as_bytes());
                self.keys.push(hash);
                self.nodes.insert(hash, node.to_string());
            }
        }
        self.keys.sort_unstable();
    }

    // == Get ==
    /// Returns the node owning `key`, or None on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        // First virtual node at or after the key, wrapping past the end
        let idx = self.keys.partition_point(|&k| k < hash) % self.keys.len();
        self.nodes.get(&self.keys[idx]).map(String::as_str)
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }
}
