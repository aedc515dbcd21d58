//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for groups, loaders and peer transports.
///
/// Errors are `Clone` because a single coalesced load hands the same
/// outcome to every caller waiting on that key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The requested key was empty
    #[error("key is required")]
    EmptyKey,

    /// The backing data source has no value for the key.
    /// Only loaders produce this; the cache never synthesizes it.
    #[error("{0} not exist")]
    NotFound(String),

    /// Any other failure reported by a loader
    #[error("loader error: {0}")]
    Loader(String),

    /// Peer unreachable or answered with a non-success status
    #[error("transport error: {0}")]
    Transport(String),

    /// A peer was asked for a group it does not host
    #[error("no such group: {0}")]
    NoSuchGroup(String),

    /// Misuse detected at construction or registration time
    #[error("configuration error: {0}")]
    Config(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey => StatusCode::BAD_REQUEST,
            CacheError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Transport(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
