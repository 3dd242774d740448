//! Error taxonomy for the lookup pipeline.
//!
//! Fatal API failures (`AccountLimit`, `UnknownApi`) carry the raw response
//! body so callers can inspect what the API actually said. A 404 with error
//! type `not_found` is NOT an error here — it becomes a normal error-shaped
//! [`crate::models::Response`] and is cached like a success.

use serde_json::Value;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PdlError>;

/// All errors surfaced by this crate.
#[derive(Debug, Error)]
pub enum PdlError {
    /// Status 402 — quota/billing rejection. Never cached, always propagated.
    #[error("account limit reached: {message}")]
    AccountLimit {
        /// Message extracted from the API error body, if any.
        message: String,
        /// The raw response body, attached for diagnostics.
        response: Value,
    },

    /// Any non-200 status not classified as a recognized "not found".
    #[error("unexpected API response (status {status}): {message}")]
    UnknownApi {
        /// Status code reported in the response body.
        status: u16,
        /// Message extracted from the API error body, if any.
        message: String,
        /// The raw response body, attached for diagnostics.
        response: Value,
    },

    /// Caller misuse: asked for a payload the response does not carry.
    #[error("response has no {0} payload")]
    MissingPayload(&'static str),

    /// The API payload could not be deserialized into the typed schema.
    #[error("malformed API payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Transport-level failure from the HTTP client.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),
}
