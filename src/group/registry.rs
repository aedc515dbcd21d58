//! Group Registry
//!
//! Name -> group lookup shared by the application and the peer server.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::error::{CacheError, Result};
use crate::group::{Getter, Group};

// == Group Registry ==
/// Owns every group a process hosts.
///
/// Populated at startup, read concurrently afterwards. Groups live as long
/// as the registry; there is no removal.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates and registers a group.
    ///
    /// Fails with a configuration error if `name` is already taken.
    pub fn new_group<G>(
        &self,
        name: impl Into<String>,
        cache_bytes: usize,
        getter: G,
    ) -> Result<Arc<Group>>
    where
        G: Getter + 'static,
    {
        let name = name.into();
        let mut groups = self.groups.write();
        if groups.contains_key(&name) {
            return Err(CacheError::Config(format!(
                "group {} already exists",
                name
            )));
        }

        let group = Arc::new(Group::new(name.clone(), cache_bytes, Arc::new(getter)));
        groups.insert(name.clone(), Arc::clone(&group));
        info!(group = %name, cache_bytes, "group created");
        Ok(group)
    }

    // == Get ==
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Registered group names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }
}
