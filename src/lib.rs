//! peercache - A distributed in-process cache
//!
//! Each process hosts named cache groups with a byte-bounded LRU cache.
//! Nodes share ownership of keys through a consistent-hash ring, and
//! concurrent misses for a key are coalesced so it is loaded at most once.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;

pub use api::AppState;
pub use cache::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Getter, GetterFunc, Group, GroupRegistry};
pub use peers::{HashRing, HttpPool, PeerGetter, PeerPicker};
