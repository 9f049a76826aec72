//! Error types for roomsync-reconcile.

use thiserror::Error;

use roomsync_client::TransportError;
use roomsync_core::RoomId;
use roomsync_renderer::RenderError;

/// Which side of the sync a roster belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterSide {
    Source,
    Destination,
}

impl std::fmt::Display for RosterSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterSide::Source => write!(f, "source"),
            RosterSide::Destination => write!(f, "destination"),
        }
    }
}

/// All errors that abort a reconciliation run.
///
/// Add-member failures never appear here; they are recorded in the report.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A roster could not be fetched; nothing was added.
    #[error("failed to fetch {side} roster for room {room}: {source}")]
    Fetch {
        side: RosterSide,
        room: RoomId,
        #[source]
        source: TransportError,
    },

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),
}

impl SyncError {
    /// Upstream HTTP status behind the failure, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            SyncError::Fetch { source, .. } => source.status(),
            SyncError::Render(_) => None,
        }
    }
}
