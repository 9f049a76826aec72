//! Domain types shared by every roomsync crate.
//!
//! Identifiers are opaque newtypes: they are compared exactly as the remote
//! service returns them, with no case folding or trimming.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Stable, globally unique identifier of a person. The identity key for diffing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub String);

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of a room on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Rosters
// ---------------------------------------------------------------------------

/// One person's presence in a room, as returned by the membership endpoint.
///
/// Email and display name are descriptive only; identity is `person_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub person_id: PersonId,
    #[serde(default)]
    pub person_email: String,
    #[serde(default)]
    pub person_display_name: String,
}

impl Member {
    /// Human-readable label used in reports: the email, or the id when the
    /// service returned no email.
    pub fn label(&self) -> &str {
        if self.person_email.is_empty() {
            &self.person_id.0
        } else {
            &self.person_email
        }
    }
}

/// Snapshot of one room's members at fetch time, in service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub room_id: RoomId,
    pub members: Vec<Member>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// What a run would do, computed without mutating the destination room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub source_room: RoomId,
    pub destination_room: RoomId,
    pub source_count: usize,
    pub destination_count: usize,
    /// Members to add, in source-roster order.
    pub missing: Vec<Member>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Outcome of a single add-member attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    Added { member: Member },
    Failed { member: Member, error: String },
}

/// A member the run could not add, with the error the service reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedMember {
    pub person_id: PersonId,
    pub person_email: String,
    pub error: String,
}

/// Structured summary of one reconciliation run.
///
/// `added + failed.len() == attempted` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub source_room: RoomId,
    pub destination_room: RoomId,
    pub attempted: usize,
    pub added: usize,
    /// Failures in the order the missing members were computed.
    pub failed: Vec<FailedMember>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u128,
}

impl SyncReport {
    /// Build a report from outcomes already ordered like the missing-member list.
    pub fn from_outcomes(
        source_room: RoomId,
        destination_room: RoomId,
        outcomes: Vec<AttemptResult>,
        started_at: DateTime<Utc>,
        duration_ms: u128,
    ) -> Self {
        let attempted = outcomes.len();
        let mut added = 0usize;
        let mut failed = Vec::new();
        for outcome in outcomes {
            match outcome {
                AttemptResult::Added { .. } => added += 1,
                AttemptResult::Failed { member, error } => failed.push(FailedMember {
                    person_id: member.person_id,
                    person_email: member.person_email,
                    error,
                }),
            }
        }

        SyncReport {
            source_room,
            destination_room,
            attempted,
            added,
            failed,
            started_at,
            duration_ms,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, email: &str) -> Member {
        Member {
            person_id: PersonId::from(id),
            person_email: email.to_string(),
            person_display_name: String::new(),
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(PersonId::from("p-1").to_string(), "p-1");
        assert_eq!(RoomId::from("r-1").to_string(), "r-1");
    }

    #[test]
    fn person_ids_are_case_sensitive() {
        assert_ne!(PersonId::from("ABC"), PersonId::from("abc"));
    }

    #[test]
    fn member_deserializes_from_service_json() {
        let json = r#"{
            "id": "membership-1",
            "roomId": "room-1",
            "personId": "Y2lzY29zcGFyazovL3VzL1BFT1BMRS8x",
            "personEmail": "ada@example.com",
            "personDisplayName": "Ada",
            "isModerator": false
        }"#;
        let m: Member = serde_json::from_str(json).expect("deserialize");
        assert_eq!(m.person_id.0, "Y2lzY29zcGFyazovL3VzL1BFT1BMRS8x");
        assert_eq!(m.person_email, "ada@example.com");
        assert_eq!(m.person_display_name, "Ada");
    }

    #[test]
    fn member_label_falls_back_to_id() {
        assert_eq!(member("p-1", "").label(), "p-1");
        assert_eq!(member("p-1", "a@example.com").label(), "a@example.com");
    }

    #[test]
    fn report_counts_follow_outcomes() {
        let outcomes = vec![
            AttemptResult::Added { member: member("a", "a@example.com") },
            AttemptResult::Failed {
                member: member("b", "b@example.com"),
                error: "HTTP 409".to_string(),
            },
            AttemptResult::Added { member: member("c", "c@example.com") },
        ];
        let report = SyncReport::from_outcomes(
            RoomId::from("src"),
            RoomId::from("dst"),
            outcomes,
            Utc::now(),
            5,
        );
        assert_eq!(report.attempted, 3);
        assert_eq!(report.added, 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].person_id, PersonId::from("b"));
        assert!(!report.is_clean());
    }
}
