//! Error types for roomsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while assembling a [`SyncConfig`](crate::SyncConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting was absent or blank.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// `ROOMSYNC_API_BASE` was not an http(s) URL.
    #[error("invalid API base URL '{value}': expected an http:// or https:// URL")]
    InvalidApiBase { value: String },

    /// `ROOMSYNC_TIMEOUT_SECS` was not a positive integer.
    #[error("invalid timeout '{value}': expected a positive number of seconds")]
    InvalidTimeout { value: String },

    /// A `.env` file existed but could not be parsed.
    #[error("failed to load {path}: {source}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },
}
