//! Error types for the remote API client.

use thiserror::Error;

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network failure, timeout, or undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The response parsed but lacked a required field.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Hostname or token cannot be used to build requests.
    #[error("invalid client configuration: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
