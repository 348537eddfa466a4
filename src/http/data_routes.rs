//! Data Operation Routes
//!
//! The `/data` endpoint: parses the operation descriptor out of the JSON
//! body, dispatches to the read or write handler, and wraps the result in
//! the gateway's response envelope.
//!
//! Two error surfaces coexist here. Validation failures (no descriptor,
//! unknown type) are rejected with HTTP 400 before any store call. Anything
//! that fails afterwards - bad `_id` encoding, malformed payload, store
//! failure - still answers HTTP 200 with `{"status":"error","message":...}`;
//! callers of the original service inspect the payload rather than the
//! status code, so the transport-level contract is preserved verbatim.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{GatewayError, GatewayResult};
use crate::normalize::normalize_document;
use crate::operation::{Operation, ReadSpec, WriteSpec};
use crate::store::{decode_filter, decode_update, DocumentStore, WriteOutcome};

use super::GatewayState;

// ==================
// Response Envelopes
// ==================

/// Envelope for a successful read
#[derive(Debug, Serialize)]
pub struct ReadEnvelope {
    pub status: &'static str,
    pub operation: &'static str,
    pub data: Value,
}

/// Envelope for a write, successful or matched-but-unchanged
#[derive(Debug, Serialize)]
pub struct WriteEnvelope {
    pub status: &'static str,
    pub operation: &'static str,
    pub matched_count: u64,
    pub modified_count: u64,
}

/// Envelope for a handled operational failure (returned with HTTP 200)
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub status: &'static str,
    pub message: String,
}

/// Body of an HTTP 400 validation rejection
#[derive(Debug, Serialize)]
pub struct ValidationBody {
    pub error: String,
}

/// Create the data operation routes
pub fn data_routes(state: Arc<GatewayState>) -> Router {
    // GET is kept for wire compatibility with existing callers; the JSON
    // body is read despite the verb.
    Router::new()
        .route("/data", get(data_handler))
        .with_state(state)
}

/// Parse, dispatch, and envelope a data operation
async fn data_handler(
    State(state): State<Arc<GatewayState>>,
    Json(body): Json<Value>,
) -> Response {
    let operation = match Operation::from_request_body(&body) {
        Ok(op) => op,
        Err(e) if e.is_validation() => {
            tracing::warn!(error = %e, "rejecting malformed data request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ValidationBody { error: e.to_string() }),
            )
                .into_response();
        }
        Err(e) => return error_envelope(e),
    };

    tracing::info!(
        operation = operation.kind(),
        collection = operation.collection_name(),
        "processing data request"
    );

    let result = match operation {
        Operation::Read(spec) => handle_read(state.store.as_ref(), spec).await,
        Operation::Write(spec) => handle_write(state.store.as_ref(), spec).await,
    };

    match result {
        Ok(response) => response,
        Err(e) => error_envelope(e),
    }
}

/// Log a handled failure and wrap it in the 200-status error envelope
fn error_envelope(error: GatewayError) -> Response {
    tracing::error!(error = %error, "error processing request");
    (
        StatusCode::OK,
        Json(ErrorEnvelope {
            status: "error",
            message: error.to_string(),
        }),
    )
        .into_response()
}

/// Handle a read: fetch one or all matching documents and normalize them.
///
/// `data` is a list exactly when `bulk` is set; a non-bulk read with no
/// match yields an empty object, never null.
async fn handle_read(store: &dyn DocumentStore, spec: ReadSpec) -> GatewayResult<Response> {
    let filter = decode_filter(&spec.query)?;

    let data = if spec.bulk {
        let docs = store.find_all(&spec.collection_name, filter).await?;
        Value::Array(docs.into_iter().map(normalize_document).collect())
    } else {
        match store.find_one(&spec.collection_name, filter).await? {
            Some(doc) => normalize_document(doc),
            None => Value::Object(Map::new()),
        }
    };

    let envelope = ReadEnvelope {
        status: "success",
        operation: "read",
        data,
    };
    Ok((StatusCode::OK, Json(envelope)).into_response())
}

/// Handle a write: merge the update fields into the first matching document.
///
/// An absent or empty update skips the store entirely and reports zero
/// counts. Status is "success" only when a document actually changed;
/// matching a document whose fields already hold the written values is
/// "no_change".
async fn handle_write(store: &dyn DocumentStore, spec: WriteSpec) -> GatewayResult<Response> {
    let filter = decode_filter(&spec.query)?;

    let outcome = match &spec.update {
        Some(update) if !update.is_empty() => {
            store
                .update_one(&spec.collection_name, filter, decode_update(update))
                .await?
        }
        _ => WriteOutcome::default(),
    };

    let envelope = WriteEnvelope {
        status: if outcome.modified_count > 0 {
            "success"
        } else {
            "no_change"
        },
        operation: "write",
        matched_count: outcome.matched_count,
        modified_count: outcome.modified_count,
    };
    Ok((StatusCode::OK, Json(envelope)).into_response())
}
