use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`crate::client::SnifferClient`].
///
/// Every variant carries the fixed, human-readable message of the endpoint
/// that failed (for example `Failed to fetch devices`).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    RequestFailed {
        message: &'static str,
        status: StatusCode,
    },

    /// The request never produced a response.
    #[error("{message}: {source}")]
    Transport {
        message: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not decode into the declared shape.
    #[error("{message}: malformed response ({reason})")]
    MalformedResponse {
        message: &'static str,
        reason: String,
    },

    /// The client could not be built from its configuration.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// The per-endpoint message, without transport or decoding detail.
    pub fn message(&self) -> &str {
        match self {
            ClientError::RequestFailed { message, .. }
            | ClientError::Transport { message, .. }
            | ClientError::MalformedResponse { message, .. } => *message,
            ClientError::Config(msg) => msg.as_str(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::RequestFailed { .. } => "request_failed",
            ClientError::Transport { .. } => "transport",
            ClientError::MalformedResponse { .. } => "malformed_response",
            ClientError::Config(_) => "config",
        }
    }
}
