use std::path::Path;

use scrub_core::store::MutationStore;

use crate::commands::common::{
    format_queue_lines, open_queue, record_to_list_item, resolve_record, QueueListItem,
};
use crate::error::CliError;

pub fn run_queue_list(limit: usize, as_json: bool, data_dir: &Path) -> Result<(), CliError> {
    let store = open_queue(data_dir)?;
    let mut records = store.list();
    records.truncate(limit);

    if as_json {
        let json_items = records
            .iter()
            .map(record_to_list_item)
            .collect::<Vec<QueueListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No mutations queued.");
        return Ok(());
    }

    for line in format_queue_lines(&records) {
        println!("{line}");
    }
    Ok(())
}

pub fn run_queue_drop(id: &str, data_dir: &Path) -> Result<(), CliError> {
    let store = open_queue(data_dir)?;
    let record = resolve_record(store.as_ref(), id)?;
    store.remove_by_id(record.id);
    println!("{}", record.id);
    Ok(())
}
