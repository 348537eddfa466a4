//! docgate - a minimal HTTP gateway for document-store read/write operations
//!
//! Translates JSON operation descriptors received over HTTP into reads and
//! writes against a MongoDB-compatible document store, and serializes the
//! results back into plain JSON.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod operation;
pub mod store;

use config::GatewayConfig;
use error::GatewayResult;
use http::server::GatewayServer;
use store::mongo::MongoStore;

/// Load configuration from the environment, connect to the store, and serve
/// until a shutdown signal arrives.
pub async fn run() -> GatewayResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = GatewayConfig::from_env()?;
    let store = MongoStore::connect(&config).await?;
    tracing::info!("store connection established");

    let server = GatewayServer::new(config, Arc::new(store));
    server.start().await?;
    Ok(())
}
