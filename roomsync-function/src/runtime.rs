use serde_json::{json, Value};
use tracing::{error, info};

use roomsync_client::RoomsClient;
use roomsync_core::SyncConfig;
use roomsync_reconcile::{notify, pipeline};

use crate::error::FunctionError;
use crate::protocol::{ActionRequest, ActionResponse};

/// Run one invocation on a fresh runtime and block until it completes.
pub fn start_blocking(request: ActionRequest) -> Result<ActionResponse, FunctionError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(handle(request)))
}

/// Handle an invocation, reading unset configuration from the environment.
pub async fn handle(request: ActionRequest) -> ActionResponse {
    handle_with_lookup(request, |key| std::env::var(key).ok()).await
}

/// Handle an invocation with an explicit environment lookup.
pub async fn handle_with_lookup<F>(request: ActionRequest, lookup: F) -> ActionResponse
where
    F: Fn(&str) -> Option<String>,
{
    match execute(request, lookup).await {
        Ok(body) => ActionResponse::ok(body),
        Err(err) => {
            error!(error = %err, "invocation failed");
            ActionResponse::error(err.status_code(), err.to_string(), err.upstream_status())
        }
    }
}

/// Resolve configuration, run (or plan) the sync and notify recipients.
///
/// On success the body is the serialized report, or the plan for a dry run.
pub async fn execute<F>(request: ActionRequest, lookup: F) -> Result<Value, FunctionError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = SyncConfig::resolve(request.config, lookup)?;
    let config = if request.reverse {
        config.swapped()
    } else {
        config
    };
    let client = RoomsClient::from_config(&config)?;

    if request.dry_run {
        let plan = pipeline::plan(&client, &config).await?;
        info!(missing = plan.missing.len(), "dry run planned");
        return Ok(json!(plan));
    }

    let report = pipeline::run(&client, &config).await?;
    let delivery = notify::deliver_best_effort(&client, &config, &report).await;
    info!(
        delivered = delivery.delivered.len(),
        undelivered = delivery.failed.len(),
        "invocation complete",
    );
    Ok(json!(report))
}

/// Install the global subscriber. Logs go to stderr so stdout carries only
/// the response document.
pub fn init_tracing(json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
