//! Integration Tests for a single node
//!
//! Drives the front-end API and peer routers through full request/response
//! cycles against a group backed by a counting in-memory source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use peercache::api::{create_api_router, create_peer_router};
use peercache::peers::DEFAULT_BASE_PATH;
use peercache::{AppState, CacheError, GetterFunc, Group, GroupRegistry};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

struct TestNode {
    state: AppState,
    group: Arc<Group>,
    loads: Arc<AtomicUsize>,
}

fn create_test_node() -> TestNode {
    let db: HashMap<&str, &str> = HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);
    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);

    let registry = Arc::new(GroupRegistry::new());
    let group = registry
        .new_group(
            "scores",
            2 << 10,
            GetterFunc::new(move |key: &str| {
                counter.fetch_add(1, Ordering::SeqCst);
                db.get(key)
                    .map(|v| v.as_bytes().to_vec())
                    .ok_or_else(|| CacheError::NotFound(key.to_string()))
            }),
        )
        .unwrap();

    TestNode {
        state: AppState::new(registry, "scores", "http://localhost:8001"),
        group,
        loads,
    }
}

async fn send(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn body_json(app: Router, uri: &str) -> Value {
    let (status, body) = send(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

// == End-to-end Lookup ==

#[tokio::test]
async fn test_lookup_loads_once_then_serves_from_cache() {
    let node = create_test_node();
    let app = create_api_router(node.state.clone());

    let (status, body) = send(app.clone(), "/api?key=Tom").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"630");
    assert_eq!(node.loads.load(Ordering::SeqCst), 1);

    let (status, body) = send(app, "/api?key=Tom").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"630");
    assert_eq!(node.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_key_errors_and_leaves_cache_unchanged() {
    let node = create_test_node();
    let app = create_api_router(node.state.clone());

    send(app.clone(), "/api?key=Tom").await;
    let before = node.group.cached_entries();

    let (status, body) = send(app, "/api?key=unknown").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8_lossy(&body).contains("unknown not exist"));
    assert_eq!(node.group.cached_entries(), before);
}

#[tokio::test]
async fn test_every_key_loaded_exactly_once() {
    let node = create_test_node();

    for (key, value) in [("Tom", "630"), ("Jack", "589"), ("Sam", "567")] {
        assert_eq!(node.group.get(key).await.unwrap().to_string(), value);
        assert_eq!(node.group.get(key).await.unwrap().to_string(), value);
    }
    assert_eq!(node.loads.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_concurrent_api_requests_load_once() {
    let node = create_test_node();
    let app = create_api_router(node.state.clone());

    let handles: Vec<_> = (0..20)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { send(app, "/api?key=Jack").await })
        })
        .collect();

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"589");
    }
    assert_eq!(node.loads.load(Ordering::SeqCst), 1);
}

// == Stats Endpoint ==

#[tokio::test]
async fn test_stats_endpoint_reflects_activity() {
    let node = create_test_node();
    let app = create_api_router(node.state.clone());

    send(app.clone(), "/api?key=Tom").await;
    send(app.clone(), "/api?key=Tom").await;

    let json = body_json(app, "/stats").await;
    assert_eq!(json["group"], "scores");
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["local_loads"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["total_bytes"], 6);
}

// == Peer Endpoint ==

#[tokio::test]
async fn test_peer_endpoint_shares_cache_with_api() {
    let node = create_test_node();
    let api = create_api_router(node.state.clone());
    let peer = create_peer_router(node.state.clone(), DEFAULT_BASE_PATH);

    let (status, body) = send(peer, "/_geecache/scores/Sam").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"567");

    let (_, body) = send(api, "/api?key=Sam").await;
    assert_eq!(body, b"567");
    assert_eq!(node.loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_peer_endpoint_unknown_group() {
    let node = create_test_node();
    let peer = create_peer_router(node.state, DEFAULT_BASE_PATH);

    let (status, _) = send(peer, "/_geecache/missing/Tom").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Health Endpoint ==

#[tokio::test]
async fn test_health_endpoint() {
    let node = create_test_node();
    let json = body_json(create_api_router(node.state), "/health").await;

    assert_eq!(json["status"], "healthy");
    assert_eq!(json["node"], "http://localhost:8001");
    assert!(json.get("timestamp").is_some());
}
