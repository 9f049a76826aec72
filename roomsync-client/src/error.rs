//! Error types for roomsync-client.

use thiserror::Error;

/// A failed request against the remote rooms API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a usable response (connect, timeout, decode).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The HTTP client could not be constructed.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl TransportError {
    /// Upstream HTTP status, when the service produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(err) => err.status().map(|s| s.as_u16()),
            TransportError::InvalidConfig(_) => None,
        }
    }
}
