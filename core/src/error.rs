//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` and `Validation` get dedicated variants because the server
//! reports them with a structured body and callers act on them differently.
//! Any other unexpected status lands in `HttpError` with the raw body.

use thiserror::Error;

/// Errors returned by `TodoClient` methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    #[error("not found: {detail}")]
    NotFound { detail: String },

    /// The server rejected the request body or path id.
    #[error("validation failed ({status}): {detail}")]
    Validation { status: u16, detail: String },

    /// The server returned some other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
