//! Template contexts: serializable rendering payloads built from run results.

use serde::{Deserialize, Serialize};

use roomsync_core::{SyncPlan, SyncReport};

use crate::error::RenderError;

/// Payload for the post-sync notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContext {
    /// `complete`, `partially failed`, or `had nothing to do`.
    pub status: String,
    pub source_room: String,
    pub destination_room: String,
    pub attempted: usize,
    pub added: usize,
    pub failed_count: usize,
    pub failures: Vec<FailureCtx>,
    /// RFC 3339, second precision.
    pub started_at: String,
    pub duration_ms: u128,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureCtx {
    pub person: String,
    pub person_id: String,
    pub error: String,
}

/// Payload for the dry-run plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanContext {
    pub source_room: String,
    pub destination_room: String,
    pub source_count: usize,
    pub destination_count: usize,
    pub missing_count: usize,
    pub missing: Vec<MemberCtx>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCtx {
    pub label: String,
    pub person_id: String,
}

impl ReportContext {
    pub fn from_report(report: &SyncReport) -> Self {
        let status = if report.attempted == 0 {
            "had nothing to do"
        } else if report.failed.is_empty() {
            "complete"
        } else {
            "partially failed"
        };

        let failures = report
            .failed
            .iter()
            .map(|f| FailureCtx {
                person: if f.person_email.is_empty() {
                    f.person_id.0.clone()
                } else {
                    f.person_email.clone()
                },
                person_id: f.person_id.0.clone(),
                error: f.error.clone(),
            })
            .collect();

        ReportContext {
            status: status.to_string(),
            source_room: report.source_room.0.clone(),
            destination_room: report.destination_room.0.clone(),
            attempted: report.attempted,
            added: report.added,
            failed_count: report.failed.len(),
            failures,
            started_at: report
                .started_at
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            duration_ms: report.duration_ms,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

impl PlanContext {
    pub fn from_plan(plan: &SyncPlan) -> Self {
        let missing: Vec<MemberCtx> = plan
            .missing
            .iter()
            .map(|m| MemberCtx {
                label: m.label().to_string(),
                person_id: m.person_id.0.clone(),
            })
            .collect();

        PlanContext {
            source_room: plan.source_room.0.clone(),
            destination_room: plan.destination_room.0.clone(),
            source_count: plan.source_count,
            destination_count: plan.destination_count,
            missing_count: missing.len(),
            missing,
        }
    }

    /// Convert to a [`tera::Context`] for rendering.
    pub fn to_tera_context(&self) -> Result<tera::Context, RenderError> {
        tera::Context::from_serialize(self).map_err(RenderError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use roomsync_core::{FailedMember, Member, PersonId, RoomId};

    fn report(attempted: usize, failed: Vec<FailedMember>) -> SyncReport {
        SyncReport {
            source_room: RoomId::from("src"),
            destination_room: RoomId::from("dst"),
            attempted,
            added: attempted - failed.len(),
            failed,
            started_at: Utc::now(),
            duration_ms: 12,
        }
    }

    #[test]
    fn status_reflects_outcome() {
        assert_eq!(ReportContext::from_report(&report(0, vec![])).status, "had nothing to do");
        assert_eq!(ReportContext::from_report(&report(2, vec![])).status, "complete");
        let failed = vec![FailedMember {
            person_id: PersonId::from("B"),
            person_email: String::new(),
            error: "HTTP 409: duplicate".to_string(),
        }];
        let ctx = ReportContext::from_report(&report(2, failed));
        assert_eq!(ctx.status, "partially failed");
        assert_eq!(ctx.failed_count, 1);
        assert_eq!(ctx.failures[0].person, "B", "falls back to id without email");
    }

    #[test]
    fn plan_context_counts_missing() {
        let plan = SyncPlan {
            source_room: RoomId::from("src"),
            destination_room: RoomId::from("dst"),
            source_count: 2,
            destination_count: 1,
            missing: vec![Member {
                person_id: PersonId::from("B"),
                person_email: "b@example.com".to_string(),
                person_display_name: "Bea".to_string(),
            }],
        };
        let ctx = PlanContext::from_plan(&plan);
        assert_eq!(ctx.missing_count, 1);
        assert_eq!(ctx.missing[0].label, "b@example.com");
        ctx.to_tera_context().expect("context conversion");
    }
}
