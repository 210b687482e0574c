use std::path::Path;
use std::sync::Arc;

use scrub_core::net::{probe_once, ManualNetworkMonitor};
use scrub_core::sync::{PassOutcome, PassSummary};

use crate::commands::common::build_engine;
use crate::error::CliError;

/// Probe connectivity once, then drain the queue in a single pass
pub async fn run_sync(api_url: &str, data_dir: &Path) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let status = probe_once(&client, api_url).await;
    let monitor = Arc::new(ManualNetworkMonitor::new(status));

    let engine = build_engine(api_url, data_dir, monitor)?;
    match engine.run_pass().await {
        PassOutcome::Offline => Err(CliError::Offline),
        PassOutcome::AlreadyRunning => {
            println!("A sync pass is already running");
            Ok(())
        }
        PassOutcome::Completed(summary) => {
            print_pass_summary(summary);
            Ok(())
        }
    }
}

pub fn print_pass_summary(summary: PassSummary) {
    if summary.attempted == 0 {
        println!("Queue empty, nothing to sync");
        return;
    }
    println!(
        "Synced {} of {} record(s), {} failed",
        summary.synced, summary.attempted, summary.failed
    );
    if summary.halted_offline {
        println!("Connection dropped mid-pass; remaining records stay queued");
    }
}
