//! # Gateway Errors
//!
//! Error types for the gateway, grouped by how they surface to callers:
//! validation errors become HTTP 400 responses, operational errors become an
//! HTTP 200 error envelope (the gateway's payload-level error contract), and
//! startup errors abort the process before the server binds.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    // ==================
    // Validation Errors (HTTP 400)
    // ==================
    /// Request body carries no operation descriptor
    #[error("no operation field found")]
    MissingOperation,

    /// Operation type is neither "read" nor "write"
    #[error("Invalid operation type")]
    InvalidOperationType,

    // ==================
    // Operational Errors (HTTP 200 error envelope)
    // ==================
    /// The `_id` filter value is not a valid `{"$oid": "<24-hex>"}` encoding
    #[error("invalid document id: {0}")]
    InvalidObjectId(String),

    /// Operation descriptor had the right type but a malformed payload
    #[error("malformed operation: {0}")]
    BadOperation(String),

    /// Store-level failure (driver error, pool exhaustion, ...)
    #[error(transparent)]
    Store(#[from] StoreError),

    // ==================
    // Startup Errors (process exits)
    // ==================
    /// The required store connection string variable is not set
    #[error("MONGO_URL environment variable is not set")]
    MissingStoreUrl,

    /// Connection string does not name a default database
    #[error("store connection string does not name a default database")]
    NoDefaultDatabase,

    /// Failure binding or serving the HTTP listener
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    /// True for errors rejected before any store call (HTTP 400 class)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GatewayError::MissingOperation | GatewayError::InvalidOperationType
        )
    }
}
