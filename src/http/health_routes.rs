//! Health Check Routes
//!
//! The `/health` endpoint pings the store: 200 `{"status":"up"}` when the
//! ping succeeds, 500 `{"status":"down"}` on any store failure.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::GatewayState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Create the health check routes
pub fn health_routes(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<GatewayState>>) -> impl IntoResponse {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "up" })),
        Err(e) => {
            tracing::warn!(error = %e, "store ping failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse { status: "down" }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let json = serde_json::to_value(HealthResponse { status: "up" }).unwrap();
        assert_eq!(json["status"], "up");
    }
}
