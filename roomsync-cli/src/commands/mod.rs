//! Subcommands and the flags they share.

pub mod diff;
pub mod sync;

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use roomsync_core::{ConfigOverrides, SyncConfig, SyncPlan};
use roomsync_renderer::Renderer;

/// Connection and room settings. Each flag overrides its `ROOMSYNC_*` variable.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Bearer token for the rooms API [env: ROOMSYNC_ACCESS_TOKEN].
    #[arg(long)]
    pub token: Option<String>,

    /// Room whose members are copied [env: ROOMSYNC_SOURCE_ROOM].
    #[arg(long)]
    pub source: Option<String>,

    /// Room that receives missing members [env: ROOMSYNC_DESTINATION_ROOM].
    #[arg(long)]
    pub destination: Option<String>,

    /// Comma-separated addresses to message the report to [env: ROOMSYNC_NOTIFY].
    #[arg(long)]
    pub notify: Option<String>,

    /// Rooms API base URL [env: ROOMSYNC_API_BASE].
    #[arg(long)]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds [env: ROOMSYNC_TIMEOUT_SECS].
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Directory of `.tera` files overriding the built-in templates [env: ROOMSYNC_TEMPLATE_DIR].
    #[arg(long)]
    pub template_dir: Option<PathBuf>,

    /// Swap source and destination for this run.
    #[arg(long)]
    pub reverse: bool,
}

impl ConfigArgs {
    /// Resolve flags plus environment into the run configuration.
    pub fn resolve(&self) -> Result<SyncConfig> {
        let overrides = ConfigOverrides {
            access_token: self.token.clone(),
            source_room: self.source.clone(),
            destination_room: self.destination.clone(),
            notify: self.notify.clone(),
            api_base: self.api_base.clone(),
            timeout_secs: self.timeout_secs,
            template_dir: self.template_dir.clone(),
        };
        let config = SyncConfig::from_env(overrides).context("invalid configuration")?;
        Ok(if self.reverse { config.swapped() } else { config })
    }
}

/// Drive `future` to completion on a fresh multi-threaded runtime.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

/// Print a plan as text through the plan template, or as pretty JSON.
pub fn print_plan(plan: &SyncPlan, config: &SyncConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }
    let renderer = Renderer::with_template_dir(config.template_dir.as_deref())
        .context("failed to load templates")?;
    let text = renderer.render_plan(plan).context("failed to render plan")?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}
