//! # Document Store Adapter
//!
//! Backend abstraction for the gateway plus the JSON-to-BSON filter decoding
//! shared by every backend. Two implementations exist: the MongoDB driver
//! backend used in production and an in-memory backend for development and
//! tests.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::GatewayError;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Store-level failure, opaque to the router beyond its message
#[derive(Debug, Error)]
pub enum StoreError {
    /// Driver-reported failure (connection, pool wait timeout, server error)
    #[error("store driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    /// Backend-specific failure outside the driver
    #[error("{0}")]
    Backend(String),
}

/// Counts reported by a write operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Documents the filter matched (0 or 1 for single-document updates)
    pub matched_count: u64,
    /// Documents actually changed; stays 0 when the update rewrote values
    /// already present
    pub modified_count: u64,
}

/// Backend interface for the gateway's read and write operations.
///
/// `update_one` performs a field-level merge: exactly the fields present in
/// `update` are overwritten on the first document matching `filter`, never a
/// full-document replace.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch at most one document matching the filter
    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Fetch every document matching the filter, with no implicit limit
    async fn find_all(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError>;

    /// Overwrite the given fields on the first document matching the filter
    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<WriteOutcome, StoreError>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release the connection pool
    async fn close(&self);
}

/// Decode a JSON query into a BSON filter.
///
/// The reserved `_id` key must carry the `{"$oid": "<24-hex>"}` encoding and
/// decodes to a native [`ObjectId`]; a malformed encoding or invalid hex
/// string fails the whole operation. Every other field converts plainly,
/// with no extended-JSON interpretation.
pub fn decode_filter(query: &Map<String, Value>) -> Result<Document, GatewayError> {
    let mut filter = Document::new();
    for (key, value) in query {
        if key == "_id" {
            let hex = value
                .get("$oid")
                .and_then(Value::as_str)
                .ok_or_else(|| GatewayError::InvalidObjectId(value.to_string()))?;
            let oid = ObjectId::parse_str(hex)
                .map_err(|e| GatewayError::InvalidObjectId(e.to_string()))?;
            filter.insert("_id", oid);
        } else {
            filter.insert(key, json_to_bson(value));
        }
    }
    Ok(filter)
}

/// Decode a JSON update document into the BSON fields to overwrite.
pub fn decode_update(update: &Map<String, Value>) -> Document {
    let mut doc = Document::new();
    for (key, value) in update {
        doc.insert(key, json_to_bson(value));
    }
    doc
}

/// Plain JSON-to-BSON conversion. Deliberately not extended-JSON aware: a
/// `$oid` anywhere other than the top-level `_id` stays a nested document.
fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => n
            .as_i64()
            .map(Bson::Int64)
            .or_else(|| n.as_f64().map(Bson::Double))
            .unwrap_or(Bson::Null),
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => {
            let mut doc = Document::new();
            for (key, value) in map {
                doc.insert(key, json_to_bson(value));
            }
            Bson::Document(doc)
        }
    }
}
