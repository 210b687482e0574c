use std::path::Path;

use crate::commands::common::open_service;
use crate::error::CliError;

pub fn run_start(
    property_name: &str,
    property_id: Option<String>,
    rooms: &[String],
    data_dir: &Path,
) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let inspection = service.start_inspection(property_name, property_id, rooms)?;

    println!("{}", inspection.id);
    for room in &inspection.rooms {
        println!("  {}  {}", room.room_id, room.room_name);
    }
    Ok(())
}
