use std::path::Path;

use scrub_core::net::probe_once;
use scrub_core::store::MutationStore;
use scrub_core::sync::queue_totals;

use crate::commands::common::open_queue;
use crate::error::CliError;

pub async fn run_status(api_url: Option<&str>, data_dir: &Path) -> Result<(), CliError> {
    match api_url {
        Some(url) => {
            let client = reqwest::Client::new();
            let status = probe_once(&client, url).await;
            println!("network  {status} ({url})");
        }
        None => println!("network  not configured (pass --api-url or set SCRUB_API_URL)"),
    }

    let queue = open_queue(data_dir)?;
    let totals = queue_totals(&queue.list());
    println!(
        "queue    {total} queued: {pending} pending, {retryable} retryable, {exhausted} exhausted",
        total = totals.total(),
        pending = totals.pending,
        retryable = totals.retryable,
        exhausted = totals.exhausted,
    );
    println!("data     {}", data_dir.display());
    Ok(())
}
