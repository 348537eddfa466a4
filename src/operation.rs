//! # Operation Descriptors
//!
//! The client-supplied object describing what store action to perform,
//! modeled as a tagged union so dispatch is exhaustive at compile time.
//!
//! Wire shape (under the request body's `operation` member):
//!
//! ```json
//! {
//!   "type": "read" | "write",
//!   "collection_name": "bots",
//!   "query": {},
//!   "bulk": false,
//!   "update": {}
//! }
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::GatewayError;

/// Collection used when the descriptor names none
pub const DEFAULT_COLLECTION: &str = "bots";

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// Payload of a read operation
#[derive(Debug, Clone, Deserialize)]
pub struct ReadSpec {
    /// Target collection (default: "bots")
    #[serde(default = "default_collection")]
    pub collection_name: String,

    /// Filter document; empty matches everything
    #[serde(default)]
    pub query: Map<String, Value>,

    /// When true, return every matching document instead of at most one
    #[serde(default)]
    pub bulk: bool,
}

/// Payload of a write operation
#[derive(Debug, Clone, Deserialize)]
pub struct WriteSpec {
    /// Target collection (default: "bots")
    #[serde(default = "default_collection")]
    pub collection_name: String,

    /// Filter document selecting the document to update
    #[serde(default)]
    pub query: Map<String, Value>,

    /// Fields to overwrite on the first matching document. Absent or empty
    /// means no store call is made at all.
    #[serde(default)]
    pub update: Option<Map<String, Value>>,
}

/// A parsed operation descriptor
#[derive(Debug, Clone)]
pub enum Operation {
    Read(ReadSpec),
    Write(WriteSpec),
}

impl Operation {
    /// Parse the operation descriptor out of a request body.
    ///
    /// A missing, null, or empty-object `operation` member is a validation
    /// error, as is a `type` that is neither "read" nor "write". A known
    /// type with a malformed payload (e.g. a non-object `query`) is an
    /// operational error instead, surfaced through the error envelope.
    pub fn from_request_body(body: &Value) -> Result<Self, GatewayError> {
        let descriptor = match body.get("operation") {
            Some(v) if !is_empty(v) => v,
            _ => return Err(GatewayError::MissingOperation),
        };

        match descriptor.get("type").and_then(Value::as_str) {
            Some("read") => {
                let spec: ReadSpec = serde_json::from_value(descriptor.clone())
                    .map_err(|e| GatewayError::BadOperation(e.to_string()))?;
                Ok(Operation::Read(spec))
            }
            Some("write") => {
                let spec: WriteSpec = serde_json::from_value(descriptor.clone())
                    .map_err(|e| GatewayError::BadOperation(e.to_string()))?;
                Ok(Operation::Write(spec))
            }
            _ => Err(GatewayError::InvalidOperationType),
        }
    }

    /// Operation kind as it appears in response envelopes
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::Read(_) => "read",
            Operation::Write(_) => "write",
        }
    }

    /// Target collection name
    pub fn collection_name(&self) -> &str {
        match self {
            Operation::Read(spec) => &spec.collection_name,
            Operation::Write(spec) => &spec.collection_name,
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_read_defaults() {
        let body = json!({"operation": {"type": "read"}});
        let op = Operation::from_request_body(&body).unwrap();
        match op {
            Operation::Read(spec) => {
                assert_eq!(spec.collection_name, "bots");
                assert!(spec.query.is_empty());
                assert!(!spec.bulk);
            }
            _ => panic!("expected read"),
        }
    }

    #[test]
    fn test_write_without_update() {
        let body = json!({"operation": {"type": "write", "query": {"name": "x"}}});
        let op = Operation::from_request_body(&body).unwrap();
        match op {
            Operation::Write(spec) => {
                assert_eq!(spec.collection_name, "bots");
                assert_eq!(spec.query.get("name"), Some(&json!("x")));
                assert!(spec.update.is_none());
            }
            _ => panic!("expected write"),
        }
    }

    #[test]
    fn test_missing_operation_field() {
        for body in [json!({}), json!({"operation": {}}), json!({"operation": null})] {
            let err = Operation::from_request_body(&body).unwrap_err();
            assert!(matches!(err, GatewayError::MissingOperation));
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        let body = json!({"operation": {"type": "delete", "query": {}}});
        let err = Operation::from_request_body(&body).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidOperationType));
    }

    #[test]
    fn test_missing_type_rejected() {
        let body = json!({"operation": {"collection_name": "bots"}});
        let err = Operation::from_request_body(&body).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidOperationType));
    }

    #[test]
    fn test_malformed_payload_is_operational_error() {
        // Known type, but query is not an object.
        let body = json!({"operation": {"type": "read", "query": "not-a-map"}});
        let err = Operation::from_request_body(&body).unwrap_err();
        assert!(matches!(err, GatewayError::BadOperation(_)));
    }

    #[test]
    fn test_kind_and_collection_accessors() {
        let body = json!({"operation": {"type": "read", "collection_name": "shops"}});
        let op = Operation::from_request_body(&body).unwrap();
        assert_eq!(op.kind(), "read");
        assert_eq!(op.collection_name(), "shops");
    }
}
