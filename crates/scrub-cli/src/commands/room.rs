use std::path::Path;

use scrub_core::models::InspectionStatus;

use crate::commands::common::{open_service, resolve_inspection, resolve_room_id};
use crate::error::CliError;

pub fn run_room_note(
    inspection_query: &str,
    room_query: &str,
    note_parts: &[String],
    data_dir: &Path,
) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let inspection = resolve_inspection(&service, inspection_query)?;
    let room_id = resolve_room_id(&inspection, room_query)?;

    let note = note_parts.join(" ");
    let cleared = note.trim().is_empty();
    let notes = if cleared { None } else { Some(note) };
    service.set_room_notes(&inspection.id, &room_id, notes)?;

    if cleared {
        println!("Notes cleared");
    } else {
        println!("Notes saved");
    }
    Ok(())
}

pub fn run_room_complete(
    inspection_query: &str,
    room_query: &str,
    data_dir: &Path,
) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let inspection = resolve_inspection(&service, inspection_query)?;
    let room_id = resolve_room_id(&inspection, room_query)?;
    let room = service.complete_room(&inspection.id, &room_id)?;

    println!("{} completed", room.room_name);
    if service
        .get_inspection(&inspection.id)
        .is_some_and(|updated| updated.status == InspectionStatus::Completed)
    {
        println!("All rooms completed; inspection closed out");
    }
    Ok(())
}
