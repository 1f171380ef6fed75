//! Client errors.

use thiserror::Error;

/// Errors that can occur while talking to the ServeRest API.
///
/// Non-2xx statuses are not errors: every completed exchange is returned as an
/// [`ApiResponse`](crate::ApiResponse) so tests can assert on it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    /// The base URL cannot carry path segments.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header value contained characters HTTP does not allow.
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),
}
