//! Group Coordinator
//!
//! A named cache namespace: local cache lookup, then peer delegation, then
//! the local loader, with concurrent misses for a key coalesced into one load.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{ByteView, CacheStats, MainCache};
use crate::error::{CacheError, Result};
use crate::group::{Flight, Getter};
use crate::peers::{PeerGetter, PeerPicker};

// == Group Stats ==
/// Snapshot of a group's counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub name: String,
    /// Main cache counters and occupancy
    pub cache: CacheStats,
    /// Values produced by the local loader
    pub local_loads: u64,
    /// Values fetched from a remote peer
    pub peer_loads: u64,
    /// Peer fetches that failed and fell back to the loader
    pub peer_errors: u64,
}

#[derive(Default)]
struct LoadCounters {
    local_loads: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
}

// == Group ==
/// A cache namespace with its own byte budget, loader and coalescer.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: MainCache,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loader: Flight<ByteView>,
    counters: LoadCounters,
}

impl Group {
    // == Constructor ==
    /// Creates a group caching at most `cache_bytes` (0 = unbounded).
    ///
    /// Most applications create groups through a `GroupRegistry` so peers
    /// can find them by name.
    pub fn new(name: impl Into<String>, cache_bytes: usize, getter: Arc<dyn Getter>) -> Self {
        Self {
            name: name.into(),
            getter,
            main_cache: MainCache::new(cache_bytes),
            peers: OnceLock::new(),
            loader: Flight::new(),
            counters: LoadCounters::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte budget of the main cache.
    pub fn cache_bytes(&self) -> usize {
        self.main_cache.max_bytes()
    }

    // == Register Peers ==
    /// Installs the peer picker. Allowed exactly once per group.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) -> Result<()> {
        self.peers.set(peers).map_err(|_| {
            CacheError::Config(format!(
                "peers already registered for group {}",
                self.name
            ))
        })?;
        info!(group = %self.name, "peer picker registered");
        Ok(())
    }

    // == Get ==
    /// Returns the value for `key`.
    ///
    /// Hits are served from the main cache. Misses are coalesced per key
    /// and resolved by the owning peer if there is one, else by the loader.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        self.loader
            .run(key, move || async move {
                if let Some(peer) = self.peers.get().and_then(|p| p.pick_peer(key)) {
                    match self.get_from_peer(peer.as_ref(), key).await {
                        Ok(value) => return Ok(value),
                        Err(err) => {
                            self.counters.peer_errors.fetch_add(1, Ordering::Relaxed);
                            warn!(group = %self.name, key, error = %err, "failed to get from peer, loading locally");
                        }
                    }
                }
                self.get_locally(key).await
            })
            .await
    }

    /// Peer results are the owner's cached copy and are not cached here.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let bytes = peer.get(&self.name, key).await?;
        self.counters.peer_loads.fetch_add(1, Ordering::Relaxed);
        debug!(group = %self.name, key, len = bytes.len(), "got value from peer");
        Ok(ByteView::from(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self.getter.get(key).await?;
        self.counters.local_loads.fetch_add(1, Ordering::Relaxed);

        let value = ByteView::copy_from(&bytes);
        self.populate_cache(key, value.clone());
        Ok(value)
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        debug!(group = %self.name, key, len = value.len(), "populating main cache");
        self.main_cache.add(key, value);
    }

    // == Stats ==
    pub fn stats(&self) -> GroupStats {
        GroupStats {
            name: self.name.clone(),
            cache: self.main_cache.stats(),
            local_loads: self.counters.local_loads.load(Ordering::Relaxed),
            peer_loads: self.counters.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.counters.peer_errors.load(Ordering::Relaxed),
        }
    }

    /// Number of entries in the main cache.
    pub fn cached_entries(&self) -> usize {
        self.main_cache.len()
    }
}
