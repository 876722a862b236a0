//! Error types for the inventory record client.
//!
//! # Design
//! Every wrapper returns the same `ApiError`, produced by the shared
//! execution helper in `service`. A non-2xx status is only an error when the
//! body is not JSON: the record service reports conditions such as "not
//! found" inside a regular envelope, and those reach the caller unchanged.
//! Callers that must not continue past a refused write turn such envelopes
//! into `Rejected` with `ServiceResponse::accepted`.

use thiserror::Error;

use crate::types::ServiceResponse;

/// Errors returned by `RecordClient` parse methods and `RecordService` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP round-trip itself failed (connection refused, reset, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned a non-2xx status and a body that is not JSON.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The `/about` endpoint answered, but not with `"operational"`.
    #[error("node {node_id} is not operational (status: {status})")]
    NotOperational { node_id: String, status: String },

    /// The service answered with an envelope whose status is not a success.
    #[error("{operation} rejected by service (status: {})", envelope.status)]
    Rejected {
        operation: &'static str,
        envelope: ServiceResponse,
    },

    /// Client configuration could not be used (e.g. an unparsable base URL).
    #[error("invalid configuration: {0}")]
    Config(String),
}
