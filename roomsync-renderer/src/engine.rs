//! Tera rendering engine: [`TemplateKind`] enum and [`Renderer`].
//!
//! | Kind     | Template          | Used by                          |
//! |----------|-------------------|----------------------------------|
//! | Report   | `report.md.tera`  | post-sync notification messages  |
//! | Plan     | `plan.txt.tera`   | `roomsync diff` / `--dry-run`    |

use std::collections::BTreeMap;
use std::path::Path;

use tera::Tera;

use roomsync_core::{SyncPlan, SyncReport};

use crate::context::{PlanContext, ReportContext};
use crate::error::RenderError;

const TPLS: &[(&str, &str)] = &[
    ("report.md.tera", include_str!("templates/report.md.tera")),
    ("plan.txt.tera", include_str!("templates/plan.txt.tera")),
];

/// The documents roomsync renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    Report,
    Plan,
}

impl TemplateKind {
    pub fn all() -> &'static [TemplateKind] {
        &[TemplateKind::Report, TemplateKind::Plan]
    }

    pub fn template_name(&self) -> &'static str {
        match self {
            TemplateKind::Report => "report.md.tera",
            TemplateKind::Plan => "plan.txt.tera",
        }
    }
}

// ---------------------------------------------------------------------------
// Template sources
// ---------------------------------------------------------------------------

/// Embedded templates, with any `.tera` file directly inside `override_dir`
/// replacing the embedded one of the same (case-insensitive) name.
///
/// A missing directory is not an error; the embedded set is used as is.
fn template_sources(override_dir: Option<&Path>) -> Result<Vec<(String, String)>, RenderError> {
    let mut sources: BTreeMap<String, String> = TPLS
        .iter()
        .map(|(name, body)| (name.to_string(), body.to_string()))
        .collect();

    let Some(dir) = override_dir.filter(|dir| dir.is_dir()) else {
        return Ok(sources.into_iter().collect());
    };
    let io = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| RenderError::Io { path, source }
    };

    for entry in std::fs::read_dir(dir).map_err(io(dir))? {
        let path = entry.map_err(io(dir))?.path();
        let is_template = path.is_file() && path.extension().is_some_and(|ext| ext == "tera");
        let Some(name) = path.file_name().and_then(|n| n.to_str()).filter(|_| is_template) else {
            continue;
        };
        let name = name.to_ascii_lowercase();
        let body = std::fs::read_to_string(&path).map_err(io(&path))?;
        sources.insert(name, body);
    }
    Ok(sources.into_iter().collect())
}

// ---------------------------------------------------------------------------
// TemplateEngine
// ---------------------------------------------------------------------------

/// Compiled template set. Override files are read once, at construction.
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    pub fn new(override_dir: Option<&Path>) -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(template_sources(override_dir)?)?;
        Ok(Self { tera })
    }

    /// Render `kind`, normalizing line endings to `\n`.
    pub fn render(&self, kind: TemplateKind, ctx: &tera::Context) -> Result<String, RenderError> {
        let rendered = self.tera.render(kind.template_name(), ctx)?;
        Ok(rendered.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders reports and plans. Create once and reuse.
pub struct Renderer {
    engine: TemplateEngine,
}

impl Renderer {
    /// Construct a [`Renderer`] with embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_template_dir(None)
    }

    /// Construct a [`Renderer`] whose templates may be overridden from `dir`.
    pub fn with_template_dir(dir: Option<&Path>) -> Result<Self, RenderError> {
        Ok(Renderer {
            engine: TemplateEngine::new(dir)?,
        })
    }

    /// Markdown notification for a finished run.
    pub fn render_report(&self, report: &SyncReport) -> Result<String, RenderError> {
        let ctx = ReportContext::from_report(report).to_tera_context()?;
        self.engine.render(TemplateKind::Report, &ctx)
    }

    /// Plain-text description of a dry run.
    pub fn render_plan(&self, plan: &SyncPlan) -> Result<String, RenderError> {
        let ctx = PlanContext::from_plan(plan).to_tera_context()?;
        self.engine.render(TemplateKind::Plan, &ctx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
