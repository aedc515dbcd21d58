//! API Routes
//!
//! Configures the Axum routers for the peer protocol and the front-end API.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{api_handler, health_handler, peer_handler, stats_handler, AppState};
use crate::peers::normalize_base_path;

/// Creates the router peers fetch from.
///
/// # Endpoints
/// - `GET {base_path}:group/*key` - Raw value bytes for a key; `base_path`
///   is normalized to start and end with `/`
/// - `GET /health` - Health check endpoint
pub fn create_peer_router(state: AppState, base_path: &str) -> Router {
    let peer_route = format!("{}:group/*key", normalize_base_path(base_path));

    Router::new()
        .route(&peer_route, get(peer_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the front-end API router.
///
/// # Endpoints
/// - `GET /api?key=...` - Raw value bytes for a key
/// - `GET /stats` - Group statistics
/// - `GET /health` - Health check endpoint
pub fn create_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", get(api_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
