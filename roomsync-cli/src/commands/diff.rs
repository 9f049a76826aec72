//! `roomsync diff`: list the members a sync would add.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use roomsync_client::RoomsClient;
use roomsync_reconcile::pipeline;

use super::{block_on, print_plan, ConfigArgs};

/// Arguments for `roomsync diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve()?;
        info!(
            source = %config.source_room,
            destination = %config.destination_room,
            "computing diff",
        );
        let client = RoomsClient::from_config(&config).context("failed to build HTTP client")?;

        let plan = block_on(pipeline::plan(&client, &config))?.with_context(|| {
            format!(
                "diff failed for {} -> {}",
                config.source_room, config.destination_room
            )
        })?;
        print_plan(&plan, &config, self.json)
    }
}
