//! peercache node
//!
//! Hosts one cache group backed by a small in-memory "slow database", serves
//! it to peers over HTTP, and optionally serves a front-end API.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peercache::api::{create_api_router, create_peer_router};
use peercache::{AppState, CacheError, Config, GetterFunc, GroupRegistry, HttpPool};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the group and its peer pool
/// 4. Start the front-end API if enabled
/// 5. Serve peer requests until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peercache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: node={}, peers={:?}, group={}, cache_bytes={}, api={}",
        config.node_addr, config.peers, config.group_name, config.cache_bytes, config.api_enabled
    );

    let registry = Arc::new(GroupRegistry::new());
    let group = registry.new_group(&config.group_name, config.cache_bytes, slow_db())?;

    let client = reqwest::Client::builder()
        .timeout(config.peer_timeout())
        .build()
        .context("failed to build peer HTTP client")?;
    let pool = Arc::new(
        HttpPool::new(&config.node_addr)
            .with_replicas(config.replicas)
            .with_client(client),
    );
    pool.set_peers(&config.peers);
    group.register_peers(pool.clone())?;

    let state = AppState::new(registry, &config.group_name, &config.node_addr);

    if config.api_enabled {
        let listener = TcpListener::bind(config.api_listen_addr())
            .await
            .with_context(|| format!("failed to bind API server at {}", config.api_addr))?;
        let app = create_api_router(state.clone());
        info!("Front-end API listening on {}", config.api_addr);
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "front-end API server failed");
            }
        });
    }

    let listener = TcpListener::bind(config.node_listen_addr())
        .await
        .with_context(|| format!("failed to bind peer server at {}", config.node_addr))?;
    info!("Cache node listening on {}", config.node_addr);

    axum::serve(listener, create_peer_router(state, pool.base_path()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Node shutdown complete");
    Ok(())
}

/// Demo data source; logs every lookup so cache hits are visible.
fn slow_db() -> GetterFunc<impl Fn(&str) -> peercache::Result<Vec<u8>> + Send + Sync> {
    let db: HashMap<&'static str, &'static str> =
        HashMap::from([("Tom", "630"), ("Jack", "589"), ("Sam", "567")]);

    GetterFunc::new(move |key: &str| {
        info!("[SlowDB] search key {}", key);
        db.get(key)
            .map(|v| v.as_bytes().to_vec())
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
