//! `roomsync sync`: add missing members and report the outcome.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use roomsync_client::RoomsClient;
use roomsync_core::SyncReport;
use roomsync_reconcile::{notify, pipeline, DeliverySummary};

use super::{block_on, print_plan, ConfigArgs};

/// Arguments for `roomsync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Show who would be added without adding anyone or sending notifications.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct SyncOutputJson<'a> {
    report: &'a SyncReport,
    notifications: &'a DeliverySummary,
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "person")]
    person: String,
    #[tabled(rename = "person id")]
    person_id: String,
    #[tabled(rename = "error")]
    error: String,
}

impl SyncArgs {
    pub fn run(self) -> Result<()> {
        let config = self.config.resolve()?;
        let client = RoomsClient::from_config(&config).context("failed to build HTTP client")?;
        let direction = format!("{} -> {}", config.source_room, config.destination_room);
        info!(
            source = %config.source_room,
            destination = %config.destination_room,
            dry_run = self.dry_run,
            recipients = config.notify.len(),
            "starting sync",
        );

        if self.dry_run {
            let plan = block_on(pipeline::plan(&client, &config))?
                .with_context(|| format!("dry run failed for {direction}"))?;
            return print_plan(&plan, &config, self.json);
        }

        let (report, delivery) = block_on(async {
            let report = pipeline::run(&client, &config).await?;
            let delivery = notify::deliver_best_effort(&client, &config, &report).await;
            Ok::<_, roomsync_reconcile::SyncError>((report, delivery))
        })?
        .with_context(|| format!("sync failed for {direction}"))?;

        if self.json {
            let out = SyncOutputJson {
                report: &report,
                notifications: &delivery,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        print_report(&report, &delivery);
        Ok(())
    }
}

fn print_report(report: &SyncReport, delivery: &DeliverySummary) {
    let marker = if report.is_clean() {
        "✓".green()
    } else {
        "!".yellow()
    };
    println!(
        "{marker} {} -> {}: {} attempted, {} added, {} failed ({} ms)",
        report.source_room,
        report.destination_room,
        report.attempted,
        report.added,
        report.failed.len(),
        report.duration_ms,
    );
    println!(
        "{}",
        format!(
            "  started {}",
            report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .bright_black()
    );

    if !report.failed.is_empty() {
        let rows: Vec<FailureRow> = report
            .failed
            .iter()
            .enumerate()
            .map(|(i, f)| FailureRow {
                index: i + 1,
                person: if f.person_email.is_empty() {
                    "-".to_string()
                } else {
                    f.person_email.clone()
                },
                person_id: f.person_id.to_string(),
                error: f.error.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
    }

    if !delivery.delivered.is_empty() {
        println!("  report sent to {}", delivery.delivered.join(", "));
    }
    for failure in &delivery.failed {
        println!(
            "  {} report not delivered to {}: {}",
            "!".yellow(),
            failure.recipient,
            failure.error
        );
    }
}
