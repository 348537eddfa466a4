//! # HTTP Server
//!
//! Assembles the gateway router and runs it until a shutdown signal
//! arrives, then closes the store connection pool. In-flight requests are
//! not drained on shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::store::DocumentStore;

use super::data_routes::data_routes;
use super::health_routes::health_routes;
use super::GatewayState;

/// Build the combined gateway router over the given store backend.
///
/// Exposed so tests can drive the exact production router against an
/// in-memory store.
pub fn gateway_router(store: Arc<dyn DocumentStore>) -> Router {
    let state = Arc::new(GatewayState::new(store));

    Router::new()
        .merge(data_routes(state.clone()))
        .merge(health_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

/// HTTP server for the gateway
pub struct GatewayServer {
    config: GatewayConfig,
    store: Arc<dyn DocumentStore>,
    router: Router,
}

impl GatewayServer {
    /// Create a server over an explicitly injected store backend
    pub fn new(config: GatewayConfig, store: Arc<dyn DocumentStore>) -> Self {
        let router = gateway_router(store.clone());
        Self {
            config,
            store,
            router,
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until SIGINT/SIGTERM, then close the store pool
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        tracing::info!(%addr, "starting docgate HTTP server");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        self.store.close().await;
        tracing::info!("shutting down gracefully");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
