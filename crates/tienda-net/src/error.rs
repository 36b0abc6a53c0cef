use thiserror::Error;

/// Failures talking to a remote endpoint.
///
/// Every variant is a "transport" outcome from the caller's point of view:
/// the coordinator falls back to local state on any of them.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// HTTP status for rejected requests, `None` for transport failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
