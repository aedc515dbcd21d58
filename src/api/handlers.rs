//! API Handlers
//!
//! HTTP request handlers for the peer protocol and the front-end API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::error::{CacheError, Result};
use crate::group::{Group, GroupRegistry};
use crate::models::{ApiQuery, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Every group this node hosts
    pub registry: Arc<GroupRegistry>,
    /// Group served by the front-end API
    pub api_group: String,
    /// This node's URL
    pub node_addr: String,
}

impl AppState {
    pub fn new(
        registry: Arc<GroupRegistry>,
        api_group: impl Into<String>,
        node_addr: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            api_group: api_group.into(),
            node_addr: node_addr.into(),
        }
    }

    fn group(&self, name: &str) -> Result<Arc<Group>> {
        self.registry
            .get(name)
            .ok_or_else(|| CacheError::NoSuchGroup(name.to_string()))
    }
}

fn octet_stream(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/octet-stream")], bytes).into_response()
}

/// Handler for GET {base_path}:group/*key
///
/// Serves a peer's request for a key this node owns.
pub async fn peer_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<Response> {
    info!(node = %state.node_addr, group = %group_name, %key, "peer request");
    let group = state.group(&group_name)?;
    let view = group.get(&key).await?;

    Ok(octet_stream(view.byte_slice()))
}

/// Handler for GET /api?key=...
///
/// Front-end lookup against the node's API group.
pub async fn api_handler(
    State(state): State<AppState>,
    Query(query): Query<ApiQuery>,
) -> Result<Response> {
    let group = state.group(&state.api_group)?;
    let view = group.get(&query.key).await?;

    Ok(octet_stream(view.byte_slice()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let group = state.group(&state.api_group)?;
    Ok(Json(StatsResponse::from(group.stats())))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.node_addr))
}
