//! API Module
//!
//! HTTP handlers and routing for a cache node.
//!
//! # Peer endpoints
//! - `GET {base_path}:group/*key` - Serve a key to another node
//!
//! # Front-end endpoints
//! - `GET /api?key=...` - Look a key up in the node's group
//! - `GET /stats` - Group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_api_router, create_peer_router};
