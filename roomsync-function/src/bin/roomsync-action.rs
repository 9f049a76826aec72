//! `roomsync-action`: one function invocation per process.
//!
//! Reads a JSON parameter object (argument, or stdin when omitted or `-`),
//! runs the sync and prints `{ "statusCode": .., "body": .. }` to stdout.
//! The process exits 0 whenever a response document was produced.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use roomsync_core::config::load_dotenv;
use roomsync_function::{init_tracing, start_blocking, ActionRequest, ActionResponse, FunctionError};

#[derive(Parser, Debug)]
#[command(
    name = "roomsync-action",
    version,
    about = "Run one room membership sync as a function invocation",
    long_about = None,
)]
struct Cli {
    /// Invocation parameters as a JSON object. Reads stdin when omitted or `-`.
    params: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    log_json: bool,
}

fn read_params(arg: Option<String>) -> Result<String> {
    match arg.as_deref() {
        Some(raw) if raw != "-" => Ok(raw.to_string()),
        _ => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read parameters from stdin")?;
            Ok(raw)
        }
    }
}

fn parse_request(raw: &str) -> Result<ActionRequest, FunctionError> {
    if raw.trim().is_empty() {
        return Ok(ActionRequest::default());
    }
    Ok(serde_json::from_str(raw)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(err) = load_dotenv() {
        tracing::warn!(error = %err, "ignoring unreadable .env file");
    }

    let raw = read_params(cli.params)?;
    let response = match parse_request(&raw) {
        Ok(request) => start_blocking(request)?,
        Err(err) => ActionResponse::error(err.status_code(), err.to_string(), None),
    };

    println!(
        "{}",
        serde_json::to_string(&response).context("failed to encode response")?
    );
    Ok(())
}
