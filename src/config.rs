//! Gateway Configuration
//!
//! Configuration for the gateway including bind address and store connection
//! settings. The store URL is mandatory and comes from the `MONGO_URL`
//! environment variable; everything else has a default.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Environment variable carrying the store connection string (required).
pub const STORE_URL_VAR: &str = "MONGO_URL";

/// Environment variable overriding the bind host (optional).
pub const HOST_VAR: &str = "DOCGATE_HOST";

/// Environment variable overriding the bind port (optional).
pub const PORT_VAR: &str = "DOCGATE_PORT";

/// Gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Store connection string; must name a default database
    pub store_url: String,

    /// Maximum concurrent store connections (default: 100)
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,

    /// How long an operation waits for a free connection before failing,
    /// in milliseconds (default: 3000)
    #[serde(default = "default_wait_queue_timeout_ms")]
    pub wait_queue_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_pool_size() -> u32 {
    100
}

fn default_wait_queue_timeout_ms() -> u64 {
    3000
}

impl GatewayConfig {
    /// Load the configuration from the environment.
    ///
    /// Fails if `MONGO_URL` is absent; unparsable optional overrides fall
    /// back to their defaults.
    pub fn from_env() -> Result<Self, GatewayError> {
        let store_url =
            std::env::var(STORE_URL_VAR).map_err(|_| GatewayError::MissingStoreUrl)?;
        let host = std::env::var(HOST_VAR).unwrap_or_else(|_| default_host());
        let port = std::env::var(PORT_VAR)
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);

        Ok(Self {
            host,
            port,
            store_url,
            max_pool_size: default_max_pool_size(),
            wait_queue_timeout_ms: default_wait_queue_timeout_ms(),
        })
    }

    /// Create a config pointing at the given store URL, defaults elsewhere
    pub fn with_store_url(store_url: impl Into<String>) -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            store_url: store_url.into(),
            max_pool_size: default_max_pool_size(),
            wait_queue_timeout_ms: default_wait_queue_timeout_ms(),
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
