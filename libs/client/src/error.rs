//! Error types for the Strato API client.

use thiserror::Error;

/// Errors from the Strato API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The resource does not exist (HTTP 404).
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Any other non-success response from the service.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connection, TLS, timeout, body decoding).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The bearer token contains bytes not valid in a header value.
    #[error("invalid bearer token")]
    InvalidToken,
}

impl ApiError {
    /// True when the error means the resource does not exist remotely.
    ///
    /// Callers treat this case contextually: it confirms a delete, clears
    /// an existence check, and fails a plain read.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }
}
