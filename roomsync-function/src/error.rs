use thiserror::Error;

use roomsync_client::TransportError;
use roomsync_core::ConfigError;
use roomsync_reconcile::SyncError;

/// Error surface for the function-invocation entry point.
#[derive(Debug, Error)]
pub enum FunctionError {
    #[error("invalid invocation parameters: {0}")]
    Params(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("client error: {0}")]
    Client(#[from] TransportError),

    #[error("sync failed: {0}")]
    Sync(#[from] SyncError),

    #[error("runtime error: {0}")]
    Runtime(#[from] std::io::Error),
}

impl FunctionError {
    /// HTTP status reported to the invoking host.
    pub fn status_code(&self) -> u16 {
        match self {
            FunctionError::Params(_) | FunctionError::Config(_) => 400,
            FunctionError::Sync(SyncError::Fetch { .. }) => 502,
            FunctionError::Sync(SyncError::Render(_))
            | FunctionError::Client(_)
            | FunctionError::Runtime(_) => 500,
        }
    }

    /// Upstream status behind the failure, if the rooms API produced one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FunctionError::Sync(err) => err.upstream_status(),
            FunctionError::Client(err) => err.status(),
            _ => None,
        }
    }
}
