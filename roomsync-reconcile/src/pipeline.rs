//! Reconciliation pipeline shared by the CLI and the function entry point.
//!
//! A run is one linear pass with two fan-out/fan-in points:
//!
//! ```text
//! fetch source ─┐                 ┌─ add m1 ─┐
//!               ├─ diff ─ missing ┼─ add m2 ─┼─ report
//! fetch dest ───┘                 └─ add mN ─┘
//! ```
//!
//! Roster fetches fail fast. Add attempts are isolated from each other and
//! all of them settle before the report is built. Nothing is retried: the
//! next run recomputes the missing set from live state.

use std::time::Instant;

use chrono::Utc;
use futures::future::join_all;
use tracing::{info, warn};

use roomsync_client::RoomService;
use roomsync_core::{AttemptResult, Member, RoomId, Roster, SyncConfig, SyncPlan, SyncReport};

use crate::diff::missing_members;
use crate::error::{RosterSide, SyncError};

/// Add every source member missing from the destination room.
pub async fn run<S>(service: &S, config: &SyncConfig) -> Result<SyncReport, SyncError>
where
    S: RoomService + ?Sized,
{
    let started_at = Utc::now();
    let timer = Instant::now();

    let (source, destination) =
        fetch_rosters(service, &config.source_room, &config.destination_room).await?;
    let missing = missing_members(&source.members, &destination.members);
    info!(
        source = %source.room_id,
        destination = %destination.room_id,
        source_members = source.len(),
        destination_members = destination.len(),
        missing = missing.len(),
        "rosters compared",
    );

    let outcomes = add_members(service, &config.destination_room, missing).await;
    let report = SyncReport::from_outcomes(
        config.source_room.clone(),
        config.destination_room.clone(),
        outcomes,
        started_at,
        timer.elapsed().as_millis(),
    );

    info!(
        attempted = report.attempted,
        added = report.added,
        failed = report.failed.len(),
        duration_ms = report.duration_ms,
        "sync finished",
    );
    Ok(report)
}

/// Compute what [`run`] would add, without touching the destination room.
pub async fn plan<S>(service: &S, config: &SyncConfig) -> Result<SyncPlan, SyncError>
where
    S: RoomService + ?Sized,
{
    let (source, destination) =
        fetch_rosters(service, &config.source_room, &config.destination_room).await?;
    let missing = missing_members(&source.members, &destination.members);

    Ok(SyncPlan {
        source_room: source.room_id,
        destination_room: destination.room_id,
        source_count: source.members.len(),
        destination_count: destination.members.len(),
        missing,
    })
}

/// Fetch both rosters concurrently; the first failure wins.
async fn fetch_rosters<S>(
    service: &S,
    source: &RoomId,
    destination: &RoomId,
) -> Result<(Roster, Roster), SyncError>
where
    S: RoomService + ?Sized,
{
    tokio::try_join!(
        fetch_roster(service, source, RosterSide::Source),
        fetch_roster(service, destination, RosterSide::Destination),
    )
}

async fn fetch_roster<S>(service: &S, room: &RoomId, side: RosterSide) -> Result<Roster, SyncError>
where
    S: RoomService + ?Sized,
{
    let members = service
        .list_memberships(room)
        .await
        .map_err(|source| SyncError::Fetch {
            side,
            room: room.clone(),
            source,
        })?;
    Ok(Roster {
        room_id: room.clone(),
        members,
    })
}

/// Issue one add per member and wait for all of them to settle.
///
/// Outcomes are returned in `missing` order regardless of completion order.
pub async fn add_members<S>(service: &S, room: &RoomId, missing: Vec<Member>) -> Vec<AttemptResult>
where
    S: RoomService + ?Sized,
{
    let attempts = missing.into_iter().map(|member| async move {
        match service.create_membership(room, &member.person_id).await {
            Ok(()) => {
                info!(room = %room, person_id = %member.person_id, "member added");
                AttemptResult::Added { member }
            }
            Err(err) => {
                warn!(
                    room = %room,
                    person_id = %member.person_id,
                    status = ?err.status(),
                    error = %err,
                    "member add failed",
                );
                AttemptResult::Failed {
                    member,
                    error: err.to_string(),
                }
            }
        }
    });
    join_all(attempts).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
