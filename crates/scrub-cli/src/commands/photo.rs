use std::path::{Path, PathBuf};

use scrub_core::media;
use scrub_core::models::PhotoRecord;

use crate::commands::common::{open_service, resolve_inspection, resolve_photo_id, resolve_room_id};
use crate::error::CliError;

pub fn run_photo_add(
    inspection_query: &str,
    room_query: &str,
    files: &[PathBuf],
    data_dir: &Path,
) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let inspection = resolve_inspection(&service, inspection_query)?;
    let room_id = resolve_room_id(&inspection, room_query)?;

    let mut photos = Vec::with_capacity(files.len());
    for file in files {
        photos.push(photo_from_file(file)?);
    }

    let attached: Vec<(String, String)> = photos
        .iter()
        .map(|photo| (photo.id.clone(), photo.file_name.clone()))
        .collect();
    service.save_photos(&inspection.id, &room_id, photos)?;

    for (id, file_name) in attached {
        println!("{id}  {file_name}");
    }
    Ok(())
}

pub fn run_photo_delete(
    inspection_query: &str,
    room_query: &str,
    photo_query: &str,
    data_dir: &Path,
) -> Result<(), CliError> {
    let service = open_service(data_dir)?;
    let inspection = resolve_inspection(&service, inspection_query)?;
    let room_id = resolve_room_id(&inspection, room_query)?;
    let Some(room) = inspection.room(&room_id) else {
        return Err(CliError::RoomNotFound(room_id));
    };
    let photo_id = resolve_photo_id(room, photo_query)?;
    service.delete_photo(&inspection.id, &room_id, &photo_id)?;

    println!("{photo_id}");
    Ok(())
}

fn photo_from_file(path: &Path) -> Result<PhotoRecord, CliError> {
    let bytes = std::fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let data_url = media::encode_data_url(&bytes, mime.essence_str());
    let file_name = path.file_name().map_or_else(
        || "photo".to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    Ok(PhotoRecord::new(data_url, file_name))
}
