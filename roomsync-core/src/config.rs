//! Run configuration.
//!
//! # Sources, highest precedence first
//!
//! 1. explicit overrides (CLI flags or function-invocation params)
//! 2. process environment (`ROOMSYNC_*`)
//! 3. a `.env` file in the working directory, loaded by [`load_dotenv`]
//!
//! Configuration is resolved once at entry into an immutable [`SyncConfig`]
//! that is passed by reference into the pipeline.
//!
//! # API pattern
//!
//! - `resolve(overrides, lookup)`: explicit variable lookup; used in tests
//! - `from_env(overrides)`: reads `std::env`, delegates to `resolve`

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::RoomId;

pub const DEFAULT_API_BASE: &str = "https://webexapis.com/v1";

pub const ENV_ACCESS_TOKEN: &str = "ROOMSYNC_ACCESS_TOKEN";
pub const ENV_SOURCE_ROOM: &str = "ROOMSYNC_SOURCE_ROOM";
pub const ENV_DESTINATION_ROOM: &str = "ROOMSYNC_DESTINATION_ROOM";
pub const ENV_NOTIFY: &str = "ROOMSYNC_NOTIFY";
pub const ENV_API_BASE: &str = "ROOMSYNC_API_BASE";
pub const ENV_TIMEOUT_SECS: &str = "ROOMSYNC_TIMEOUT_SECS";
pub const ENV_TEMPLATE_DIR: &str = "ROOMSYNC_TEMPLATE_DIR";

/// Values supplied by the caller that take precedence over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub access_token: Option<String>,
    pub source_room: Option<String>,
    pub destination_room: Option<String>,
    /// Comma-delimited notification addresses.
    pub notify: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<u64>,
    pub template_dir: Option<PathBuf>,
}

/// Fully resolved, immutable configuration for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub access_token: String,
    pub source_room: RoomId,
    pub destination_room: RoomId,
    /// Empty when notification is disabled.
    pub notify: Vec<String>,
    /// Base URL without a trailing slash.
    pub api_base: String,
    /// `None` means requests never time out.
    pub timeout: Option<Duration>,
    /// Directory of `.tera` files overriding the embedded report templates.
    pub template_dir: Option<PathBuf>,
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("access_token", &"<redacted>")
            .field("source_room", &self.source_room)
            .field("destination_room", &self.destination_room)
            .field("notify", &self.notify)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .field("template_dir", &self.template_dir)
            .finish()
    }
}

impl SyncConfig {
    /// Resolve configuration using `lookup` for environment variables.
    pub fn resolve<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: Option<String>, key: &str| -> Option<String> {
            explicit
                .or_else(|| lookup(key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let access_token = pick(overrides.access_token, ENV_ACCESS_TOKEN)
            .ok_or(ConfigError::Missing(ENV_ACCESS_TOKEN))?;
        let source_room = pick(overrides.source_room, ENV_SOURCE_ROOM)
            .ok_or(ConfigError::Missing(ENV_SOURCE_ROOM))?;
        let destination_room = pick(overrides.destination_room, ENV_DESTINATION_ROOM)
            .ok_or(ConfigError::Missing(ENV_DESTINATION_ROOM))?;

        let notify = pick(overrides.notify, ENV_NOTIFY)
            .map(|raw| parse_notify_list(&raw))
            .unwrap_or_default();

        let api_base = pick(overrides.api_base, ENV_API_BASE)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let api_base = normalize_api_base(&api_base)?;

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => Some(secs),
            None => pick(None, ENV_TIMEOUT_SECS)
                .map(|raw| {
                    raw.parse::<u64>()
                        .map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })
                })
                .transpose()?,
        };
        let timeout = match timeout_secs {
            Some(0) => {
                return Err(ConfigError::InvalidTimeout {
                    value: "0".to_string(),
                })
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let template_dir = overrides
            .template_dir
            .or_else(|| pick(None, ENV_TEMPLATE_DIR).map(PathBuf::from));

        Ok(SyncConfig {
            access_token,
            source_room: RoomId::from(source_room),
            destination_room: RoomId::from(destination_room),
            notify,
            api_base,
            timeout,
            template_dir,
        })
    }

    /// Resolve configuration from the process environment.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// The same configuration with source and destination exchanged, for
    /// running the reverse direction.
    pub fn swapped(&self) -> Self {
        let mut swapped = self.clone();
        std::mem::swap(&mut swapped.source_room, &mut swapped.destination_room);
        swapped
    }

    pub fn notifications_enabled(&self) -> bool {
        !self.notify.is_empty()
    }
}

/// Split a comma-delimited address list, dropping blank entries.
pub fn parse_notify_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_api_base(raw: &str) -> Result<String, ConfigError> {
    if !(raw.starts_with("http://") || raw.starts_with("https://")) {
        return Err(ConfigError::InvalidApiBase {
            value: raw.to_string(),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Load `<dir>/.env` into the process environment if the file exists.
///
/// Variables already present in the environment are not overwritten.
/// Returns whether a file was loaded.
pub fn load_dotenv_at(dir: &Path) -> Result<bool, ConfigError> {
    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(false);
    }
    dotenv::from_path(&path).map_err(|source| ConfigError::Dotenv { path, source })?;
    Ok(true)
}

/// `load_dotenv_at` for the current working directory.
pub fn load_dotenv() -> Result<bool, ConfigError> {
    match std::env::current_dir() {
        Ok(dir) => load_dotenv_at(&dir),
        Err(_) => Ok(false),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
