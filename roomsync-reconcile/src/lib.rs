//! # roomsync-reconcile
//!
//! One-way membership reconciliation between two rooms.
//!
//! Call [`pipeline::run`] to add every source member missing from the
//! destination, [`pipeline::plan`] to compute the same set without adding,
//! and [`notify::deliver`] to send the resulting report to recipients.

pub mod diff;
pub mod error;
pub mod notify;
pub mod pipeline;

pub use diff::missing_members;
pub use error::{RosterSide, SyncError};
pub use notify::{deliver, DeliverySummary};
pub use pipeline::{plan, run};
