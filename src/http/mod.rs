//! # Gateway HTTP Module
//!
//! Axum routers and handlers for the gateway's two endpoints:
//!
//! - `/data` - JSON operation descriptor dispatch (read/write)
//! - `/health` - store reachability check

pub mod data_routes;
pub mod health_routes;
pub mod server;

use std::sync::Arc;

use crate::store::DocumentStore;

pub use server::GatewayServer;

/// State shared across handlers: the store backend, injected explicitly so
/// tests can swap in an in-memory implementation.
pub struct GatewayState {
    pub store: Arc<dyn DocumentStore>,
}

impl GatewayState {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}
