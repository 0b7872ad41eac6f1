//! Error types for the catalog client.

use thiserror::Error;

/// Result alias for client operations.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Errors raised by remote catalog calls.
///
/// All of these are fatal to the reconciliation step that issued the call,
/// not to the crawl: the crawler catches per system/body, logs and moves on.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote answered with a non-success status.
    #[error("remote returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text, kept for the log line.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response was JSON but not the shape this endpoint produces.
    #[error("unexpected response shape: {0}")]
    Payload(String),
}
