//! Peers Module
//!
//! Peer selection and remote fetch contracts, the consistent-hash ring that
//! backs selection, and the HTTP binding of both.
//!
//! # Wire format
//! `GET {base_path}{escape(group)}/{escape(key)}` answers 200 with the raw
//! value bytes (`application/octet-stream`). Any other status is a transport
//! error; 404 means the peer hosts no such group.

mod client;
mod pool;
mod ring;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use client::HttpGetter;
pub use pool::{normalize_base_path, HttpPool, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};
pub use ring::{HashFn, HashRing};

// == Peer Picker ==
/// Chooses the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the remote peer owning `key`.
    ///
    /// Returns None when the ring is empty or the owner is the local node;
    /// an implementation must never hand back a getter for itself.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

// == Peer Getter ==
/// Fetches a value from one remote group instance.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>>;
}
