//! Group Module
//!
//! Named cache namespaces, the coalescer that keeps concurrent misses down
//! to one load per key, and the registry that owns them.

mod flight;
#[allow(clippy::module_inception)]
mod group;
mod loader;
mod registry;

pub use flight::Flight;
pub use group::{Group, GroupStats};
pub use loader::{Getter, GetterFunc};
pub use registry::GroupRegistry;
