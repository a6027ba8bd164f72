use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by [`AdminClient`](super::AdminClient). Nothing is
/// retried.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Empty response body with status {0}")]
    EmptyBody(StatusCode),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } | ClientError::EmptyBody(status) => Some(*status),
            ClientError::Transport(e) => e.status(),
            ClientError::Decode(_) => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
