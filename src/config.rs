//! Configuration Module
//!
//! Handles loading node configuration from environment variables.

use std::env;
use std::time::Duration;

const DEFAULT_NODE_ADDR: &str = "http://localhost:8001";
const DEFAULT_PEERS: &str = "http://localhost:8001,http://localhost:8002,http://localhost:8003";
const DEFAULT_API_ADDR: &str = "http://localhost:9999";

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// This node's URL as known to its peers
    pub node_addr: String,
    /// Every node in the cluster, this one included
    pub peers: Vec<String>,
    /// Whether to serve the front-end API
    pub api_enabled: bool,
    /// Front-end API URL
    pub api_addr: String,
    /// Group name served by this node
    pub group_name: String,
    /// Main cache budget in bytes (0 = unbounded)
    pub cache_bytes: usize,
    /// Virtual nodes per peer on the hash ring
    pub replicas: usize,
    /// Timeout applied to each peer fetch, in milliseconds
    pub peer_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NODE_ADDR` - This node's URL (default: http://localhost:8001)
    /// - `PEERS` - Comma separated cluster URLs (default: localhost:8001-8003)
    /// - `API_ENABLED` - Serve the front-end API (default: false)
    /// - `API_ADDR` - Front-end API URL (default: http://localhost:9999)
    /// - `GROUP_NAME` - Group to host (default: scores)
    /// - `CACHE_BYTES` - Main cache budget (default: 2048)
    /// - `REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `PEER_TIMEOUT_MS` - Peer fetch timeout (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            node_addr: env::var("NODE_ADDR").unwrap_or(defaults.node_addr),
            peers: env::var("PEERS")
                .ok()
                .map(|v| parse_peers(&v))
                .filter(|peers| !peers.is_empty())
                .unwrap_or(defaults.peers),
            api_enabled: env::var("API_ENABLED")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.api_enabled),
            api_addr: env::var("API_ADDR").unwrap_or(defaults.api_addr),
            group_name: env::var("GROUP_NAME").unwrap_or(defaults.group_name),
            cache_bytes: env::var("CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_bytes),
            replicas: env::var("REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.replicas),
            peer_timeout_ms: env::var("PEER_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.peer_timeout_ms),
        }
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms)
    }

    /// Socket address to bind the peer server to.
    pub fn node_listen_addr(&self) -> &str {
        listen_addr(&self.node_addr)
    }

    /// Socket address to bind the front-end API to.
    pub fn api_listen_addr(&self) -> &str {
        listen_addr(&self.api_addr)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_addr: DEFAULT_NODE_ADDR.to_string(),
            peers: parse_peers(DEFAULT_PEERS),
            api_enabled: false,
            api_addr: DEFAULT_API_ADDR.to_string(),
            group_name: "scores".to_string(),
            cache_bytes: 2 << 10,
            replicas: crate::peers::DEFAULT_REPLICAS,
            peer_timeout_ms: 3000,
        }
    }
}

/// Splits a comma separated peer list, dropping blanks and trailing slashes.
pub fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().trim_end_matches('/'))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Strips the scheme from a node URL: `http://localhost:8001` -> `localhost:8001`.
pub fn listen_addr(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.node_addr, "http://localhost:8001");
        assert_eq!(config.peers.len(), 3);
        assert!(!config.api_enabled);
        assert_eq!(config.group_name, "scores");
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.replicas, 50);
        assert_eq!(config.peer_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for var in [
            "NODE_ADDR",
            "PEERS",
            "API_ENABLED",
            "API_ADDR",
            "GROUP_NAME",
            "CACHE_BYTES",
            "REPLICAS",
            "PEER_TIMEOUT_MS",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.node_addr, "http://localhost:8001");
        assert_eq!(config.peers, Config::default().peers);
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.node_listen_addr(), "localhost:8001");
        assert_eq!(config.api_listen_addr(), "localhost:9999");
    }

    #[test]
    fn test_parse_peers() {
        assert_eq!(
            parse_peers(" http://a:1/ , ,http://b:2"),
            vec!["http://a:1", "http://b:2"]
        );
        assert!(parse_peers("").is_empty());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_listen_addr() {
        assert_eq!(listen_addr("http://localhost:8001"), "localhost:8001");
        assert_eq!(listen_addr("127.0.0.1:80"), "127.0.0.1:80");
    }
}
