//! roomsync core library: domain types and run configuration.
//!
//! - [`types`]: members, rosters and the per-run [`SyncReport`]
//! - [`config`]: [`SyncConfig`] resolution from flags, params and environment
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{ConfigOverrides, SyncConfig};
pub use error::ConfigError;
pub use types::{
    AttemptResult, FailedMember, Member, PersonId, RoomId, Roster, SyncPlan, SyncReport,
};
