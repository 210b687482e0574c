use std::path::Path;

use crate::commands::common::{
    open_service, resolve_inspection, resolve_room_id, resolve_task_id,
};
use crate::error::CliError;

pub fn run_task_add(
    inspection_query: &str,
    room_query: &str,
    description_parts: &[String],
    data_dir: &Path,
) -> Result<(), CliError> {
    let description = description_parts.join(" ");
    if description.trim().is_empty() {
        return Err(CliError::EmptyDescription);
    }

    let service = open_service(data_dir)?;
    let inspection = resolve_inspection(&service, inspection_query)?;
    let room_id = resolve_room_id(&inspection, room_query)?;
    let task = service.add_task(&inspection.id, &room_id, &description)?;

    println!("{}", task.id);
    Ok(())
}

pub fn run_task_set_done(
    inspection_query: &str,
    room_query: &str,
    task_query: &str,
    completed: bool,
    data_dir: &Path,
) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let inspection = resolve_inspection(&service, inspection_query)?;
    let room_id = resolve_room_id(&inspection, room_query)?;
    let Some(room) = inspection.room(&room_id) else {
        return Err(CliError::RoomNotFound(room_id));
    };
    let task_id = resolve_task_id(room, task_query)?;
    service.set_task_done(&inspection.id, &room_id, &task_id, completed)?;

    println!("{task_id}");
    Ok(())
}
