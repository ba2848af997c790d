//! Error taxonomy of the Robot webservice client

use thiserror::Error;

/// Failure of a single request/response exchange with the Robot webservice
#[derive(Debug, Error)]
pub enum RobotError {
    /// DNS, connection, TLS or timeout failure before a response arrived
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status; displays as the raw response body
    #[error("{body}")]
    Api { status: u16, body: String },

    /// Success status but the body did not match the expected shape
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RobotError {
    /// HTTP status code, when the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }

    /// Raw body of a rejected request
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RobotError>;
