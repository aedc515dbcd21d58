//! Request DTOs for the front-end API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string for the lookup operation (GET /api?key=...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    /// The key to look up; absent is treated as empty
    #[serde(default)]
    pub key: String,
}
