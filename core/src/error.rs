//! Error types for the REST demo client.
//!
//! `NotFound` gets its own variant because the download endpoint reports a
//! missing file with 404, and callers want to branch on that. Every other
//! unexpected status lands in `HttpError` with the raw body for debugging.

use thiserror::Error;

/// Errors returned by `RestClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-200 status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be encoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}
