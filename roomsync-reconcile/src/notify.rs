//! Result reporting: render a [`SyncReport`] and message it to recipients.
//!
//! Delivery runs after the report exists and is awaited so a short-lived host
//! does not exit mid-send, but its failures never change the run's outcome.

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use roomsync_client::RoomService;
use roomsync_core::{SyncConfig, SyncReport};
use roomsync_renderer::Renderer;

use crate::error::SyncError;

/// Per-recipient delivery outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliverySummary {
    pub delivered: Vec<String>,
    pub failed: Vec<DeliveryFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub error: String,
}

/// Render `report` once and send it to every recipient concurrently.
///
/// Only a rendering failure is returned as an error; send failures are
/// collected into the summary.
pub async fn deliver<S>(
    service: &S,
    renderer: &Renderer,
    report: &SyncReport,
    recipients: &[String],
) -> Result<DeliverySummary, SyncError>
where
    S: RoomService + ?Sized,
{
    if recipients.is_empty() {
        return Ok(DeliverySummary::default());
    }
    let markdown = renderer.render_report(report)?;

    let sends = recipients.iter().map(|recipient| {
        let markdown = markdown.as_str();
        async move {
            let result = service.create_message(recipient, markdown).await;
            (recipient, result)
        }
    });

    let mut summary = DeliverySummary::default();
    for (recipient, result) in join_all(sends).await {
        match result {
            Ok(()) => summary.delivered.push(recipient.clone()),
            Err(err) => {
                warn!(recipient = %recipient, error = %err, "report delivery failed");
                summary.failed.push(DeliveryFailure {
                    recipient: recipient.clone(),
                    error: err.to_string(),
                });
            }
        }
    }
    info!(
        delivered = summary.delivered.len(),
        failed = summary.failed.len(),
        "report notifications sent",
    );
    Ok(summary)
}

/// Deliver to `config.notify`, logging instead of returning any failure.
pub async fn deliver_best_effort<S>(
    service: &S,
    config: &SyncConfig,
    report: &SyncReport,
) -> DeliverySummary
where
    S: RoomService + ?Sized,
{
    if !config.notifications_enabled() {
        return DeliverySummary::default();
    }

    let renderer = match Renderer::with_template_dir(config.template_dir.as_deref()) {
        Ok(renderer) => renderer,
        Err(err) => {
            warn!(error = %err, "report templates failed to load; skipping notifications");
            return DeliverySummary::default();
        }
    };

    match deliver(service, &renderer, report, &config.notify).await {
        Ok(summary) => summary,
        Err(err) => {
            warn!(error = %err, "report rendering failed; skipping notifications");
            DeliverySummary::default()
        }
    }
}
