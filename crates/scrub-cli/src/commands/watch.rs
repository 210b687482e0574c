use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use scrub_core::net::ProbeMonitor;

use crate::commands::common::build_engine;
use crate::error::CliError;

/// Probe connectivity on an interval and sync whenever it comes back
///
/// The monitor starts offline, so the very first successful probe is
/// itself a reconnect edge and triggers an initial pass.
pub async fn run_watch(interval_secs: u64, api_url: &str, data_dir: &Path) -> Result<(), CliError> {
    let interval_secs = interval_secs.max(1);
    let client = reqwest::Client::new();
    let monitor = Arc::new(ProbeMonitor::start(
        client,
        api_url.to_string(),
        Duration::from_secs(interval_secs),
    ));
    let engine = Arc::new(build_engine(api_url, data_dir, monitor)?);

    println!("Watching {api_url} every {interval_secs}s; Ctrl-C to stop");

    let reconnect = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.run_on_reconnect().await })
    };
    // Let the listener subscribe before the first probe result can land
    tokio::task::yield_now().await;

    tokio::select! {
        _ = reconnect => {}
        _ = tokio::signal::ctrl_c() => {
            println!();
            println!("Stopped");
        }
    }
    Ok(())
}
