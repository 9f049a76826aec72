//! # roomsync-renderer
//!
//! Tera-based formatting of run results: the Markdown notification sent
//! after a sync and the plain-text plan shown by a dry run.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use roomsync_core::SyncReport;
//! use roomsync_renderer::Renderer;
//!
//! fn announce(report: &SyncReport) {
//!     if let Ok(renderer) = Renderer::new() {
//!         if let Ok(markdown) = renderer.render_report(report) {
//!             println!("{markdown}");
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;

pub use context::{PlanContext, ReportContext};
pub use engine::{Renderer, TemplateEngine, TemplateKind};
pub use error::RenderError;
