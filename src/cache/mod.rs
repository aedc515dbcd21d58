//! Cache Module
//!
//! Byte-bounded LRU engine, the read-only value type, and the locked main
//! cache a group keeps its locally loaded values in.

mod byteview;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use byteview::ByteView;
pub use entry::{CacheEntry, Value};
pub use lru::{EvictionCallback, LruCache};
pub use stats::CacheStats;
pub use store::MainCache;
