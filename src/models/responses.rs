//! Response DTOs for the front-end API
//!
//! Defines the structure of outgoing JSON bodies.

use serde::Serialize;

use crate::group::GroupStats;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Group name
    pub group: String,
    /// Main cache hits
    pub hits: u64,
    /// Main cache misses
    pub misses: u64,
    /// Entries evicted from the main cache
    pub evictions: u64,
    /// Current number of entries in the main cache
    pub total_entries: usize,
    /// Currently accounted bytes
    pub total_bytes: usize,
    /// Values produced by the local loader
    pub local_loads: u64,
    /// Values fetched from peers
    pub peer_loads: u64,
    /// Failed peer fetches
    pub peer_errors: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<GroupStats> for StatsResponse {
    fn from(stats: GroupStats) -> Self {
        Self {
            hit_rate: stats.cache.hit_rate(),
            group: stats.name,
            hits: stats.cache.hits,
            misses: stats.cache.misses,
            evictions: stats.cache.evictions,
            total_entries: stats.cache.total_entries,
            total_bytes: stats.cache.total_bytes,
            local_loads: stats.local_loads,
            peer_loads: stats.peer_loads,
            peer_errors: stats.peer_errors,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// This node's URL
    pub node: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(node: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            node: node.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
