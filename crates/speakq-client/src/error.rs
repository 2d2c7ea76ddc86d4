//! Internal error types for synthesis requests.
//!
//! These are mapped to [`SpeechError::Synthesis`](speakq_core::SpeechError)
//! at the port boundary.

use thiserror::Error;

/// Result type alias for synthesis client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors talking to the synthesis server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("Synthesis server returned {status}: {body}")]
    ServerRejected {
        /// HTTP status code
        status: u16,
        /// Response body, as the server's explanation
        body: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
