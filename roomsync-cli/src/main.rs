//! roomsync: one-way room membership reconciliation.
//!
//! # Usage
//!
//! ```text
//! roomsync sync [--dry-run] [--reverse] [--json] [CONFIG FLAGS]
//! roomsync diff [--reverse] [--json] [CONFIG FLAGS]
//! ```
//!
//! Config flags override `ROOMSYNC_*` environment variables, which in turn
//! may come from a `.env` file in the working directory.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{diff::DiffArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "roomsync",
    version,
    about = "Copy every member of one room into another",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add every source-room member missing from the destination room.
    Sync(SyncArgs),

    /// Show which members a sync would add, without adding them.
    Diff(DiffArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    roomsync_core::config::load_dotenv()?;

    match cli.command {
        Commands::Sync(args) => args.run(),
        Commands::Diff(args) => args.run(),
    }
}
