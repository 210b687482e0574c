use std::cmp::Reverse;
use std::path::Path;

use crate::commands::common::{
    format_inspection_lines, inspection_to_list_item, open_service, InspectionListItem,
};
use crate::error::CliError;

pub fn run_inspections(as_json: bool, data_dir: &Path) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let mut inspections = service.list_inspections();
    inspections.sort_by_key(|inspection| Reverse(inspection.last_modified));

    if as_json {
        let json_items = inspections
            .iter()
            .map(inspection_to_list_item)
            .collect::<Vec<InspectionListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if inspections.is_empty() {
        println!("No inspections cached.");
        return Ok(());
    }

    for line in format_inspection_lines(&inspections) {
        println!("{line}");
    }
    Ok(())
}
