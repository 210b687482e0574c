use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use scrub_core::api::HttpRemoteApi;
use scrub_core::models::{
    InspectionSnapshot, MutationPayload, MutationRecord, PhotoRecord, RoomSnapshot, RoomStatus,
    TaskItem, RETRY_LIMIT,
};
use scrub_core::net::NetworkMonitor;
use scrub_core::offline::{OfflineService, MIN_PHOTOS_PER_ROOM};
use scrub_core::store::{
    JsonFileMutationStore, MutationStore, SnapshotStore, QUEUE_FILE_NAME, SNAPSHOT_FILE_NAME,
};
use scrub_core::sync::SyncEngine;
use serde::Serialize;

use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct QueueListItem {
    pub id: String,
    pub kind: String,
    pub action: String,
    pub state: String,
    pub retry_count: u32,
    pub enqueued_at: i64,
    pub relative_time: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct InspectionListItem {
    pub id: String,
    pub property_name: String,
    pub property_id: Option<String>,
    pub status: String,
    pub rooms_completed: usize,
    pub rooms_total: usize,
    pub created_at: i64,
    pub last_modified: i64,
    pub relative_time: String,
}

pub fn open_queue(data_dir: &Path) -> Result<Arc<JsonFileMutationStore>, CliError> {
    Ok(Arc::new(JsonFileMutationStore::open(
        data_dir.join(QUEUE_FILE_NAME),
    )?))
}

pub fn open_service(data_dir: &Path) -> Result<OfflineService, CliError> {
    let snapshots = SnapshotStore::open(data_dir.join(SNAPSHOT_FILE_NAME))?;
    let queue = open_queue(data_dir)?;
    Ok(OfflineService::new(snapshots, queue))
}

pub fn build_engine(
    api_url: &str,
    data_dir: &Path,
    monitor: Arc<dyn NetworkMonitor>,
) -> Result<SyncEngine, CliError> {
    let queue = open_queue(data_dir)?;
    let api = Arc::new(HttpRemoteApi::new(api_url)?);
    Ok(SyncEngine::new(queue, api, monitor))
}

pub fn resolve_inspection(
    service: &OfflineService,
    query: &str,
) -> Result<InspectionSnapshot, CliError> {
    let query = normalize_identifier(query)?;
    if let Some(inspection) = service.get_inspection(&query) {
        return Ok(inspection);
    }

    let mut matches: Vec<InspectionSnapshot> = service
        .list_inspections()
        .into_iter()
        .filter(|inspection| inspection.id.starts_with(&query))
        .collect();

    match matches.len() {
        0 => Err(CliError::InspectionNotFound(query)),
        1 => Ok(matches.remove(0)),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|inspection| short_id(&inspection.id))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

/// Resolve a room by id, unique id prefix, or exact name (case-insensitive)
pub fn resolve_room_id(inspection: &InspectionSnapshot, query: &str) -> Result<String, CliError> {
    let query = normalize_identifier(query)?;
    if inspection.room(&query).is_some() {
        return Ok(query);
    }

    let matches: Vec<&RoomSnapshot> = inspection
        .rooms
        .iter()
        .filter(|room| {
            room.room_name.eq_ignore_ascii_case(&query)
                || room.room_id.starts_with(&query)
                || room.id.starts_with(&query)
        })
        .collect();

    match matches.len() {
        0 => Err(CliError::RoomNotFound(query)),
        1 => Ok(matches[0].room_id.clone()),
        _ => {
            let options = matches
                .iter()
                .map(|room| room.room_name.clone())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousId(format!(
                "Room '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn resolve_task_id(room: &RoomSnapshot, query: &str) -> Result<String, CliError> {
    let query = normalize_identifier(query)?;
    if room.task(&query).is_some() {
        return Ok(query);
    }

    let matches: Vec<&TaskItem> = room
        .tasks
        .iter()
        .filter(|task| task.id.starts_with(&query))
        .collect();

    match matches.len() {
        0 => Err(CliError::TaskNotFound(query)),
        1 => Ok(matches[0].id.clone()),
        _ => Err(CliError::AmbiguousId(format!(
            "Task ID prefix '{query}' is ambiguous"
        ))),
    }
}

pub fn resolve_photo_id(room: &RoomSnapshot, query: &str) -> Result<String, CliError> {
    let query = normalize_identifier(query)?;
    if room.photo(&query).is_some() {
        return Ok(query);
    }

    let matches: Vec<&PhotoRecord> = room
        .photos
        .iter()
        .filter(|photo| photo.id.starts_with(&query))
        .collect();

    match matches.len() {
        0 => Err(CliError::PhotoNotFound(query)),
        1 => Ok(matches[0].id.clone()),
        _ => Err(CliError::AmbiguousId(format!(
            "Photo ID prefix '{query}' is ambiguous"
        ))),
    }
}

pub fn resolve_record(store: &dyn MutationStore, query: &str) -> Result<MutationRecord, CliError> {
    let query = normalize_identifier(query)?;
    let mut matches: Vec<MutationRecord> = store
        .list()
        .into_iter()
        .filter(|record| record.id.as_str().starts_with(&query))
        .collect();

    match matches.len() {
        0 => Err(CliError::MutationNotFound(query)),
        1 => Ok(matches.remove(0)),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|record| short_id(&record.id.as_str()))
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn format_queue_lines(records: &[MutationRecord]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    records
        .iter()
        .map(|record| {
            let short = short_id(&record.id.as_str());
            let label = format!("{} {}", record.kind, record.action);
            let relative_time = format_relative_time(record.enqueued_at, now_ms);
            let retries = if record.retry_count > 0 {
                format!("  retry {}/{RETRY_LIMIT}", record.retry_count)
            } else {
                String::new()
            };
            format!(
                "{short:<13}  {label:<17}  {state:<9}  {relative_time:<10}  {summary}{retries}",
                state = record.state.to_string(),
                summary = describe_record(record),
            )
        })
        .collect()
}

pub fn record_to_list_item(record: &MutationRecord) -> QueueListItem {
    let now_ms = Utc::now().timestamp_millis();
    QueueListItem {
        id: record.id.as_str(),
        kind: record.kind.to_string(),
        action: record.action.to_string(),
        state: record.state.to_string(),
        retry_count: record.retry_count,
        enqueued_at: record.enqueued_at,
        relative_time: format_relative_time(record.enqueued_at, now_ms),
        summary: describe_record(record),
    }
}

/// One-line human summary of what a queued mutation would replay
pub fn describe_record(record: &MutationRecord) -> String {
    match &record.payload {
        MutationPayload::Inspection { inspection } => inspection.property_name.clone(),
        MutationPayload::Room { room, .. } => {
            format!("{} ({} tasks)", room.room_name, room.tasks.len())
        }
        MutationPayload::PhotoUpload { photo, .. } => photo.file_name.clone(),
        MutationPayload::PhotoDelete { photo_id, .. } => format!("photo {}", short_id(photo_id)),
    }
}

pub fn format_inspection_lines(inspections: &[InspectionSnapshot]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    let mut lines = Vec::new();
    for inspection in inspections {
        let completed = inspection
            .rooms
            .iter()
            .filter(|room| room.status == RoomStatus::Completed)
            .count();
        let relative_time = format_relative_time(inspection.last_modified, now_ms);
        lines.push(format!(
            "{short:<13}  {name:<24}  {status:<12}  {completed}/{total} rooms  {relative_time}",
            short = short_id(&inspection.id),
            name = inspection.property_name,
            status = inspection.status.to_string(),
            total = inspection.rooms.len(),
        ));
        for room in &inspection.rooms {
            lines.push(format_room_line(room));
        }
    }
    lines
}

pub fn format_room_line(room: &RoomSnapshot) -> String {
    let done = room.tasks.iter().filter(|task| task.completed).count();
    let marker = if room.status == RoomStatus::Completed {
        "completed"
    } else if room.is_ready_for_completion(MIN_PHOTOS_PER_ROOM) {
        "ready"
    } else {
        ""
    };
    format!(
        "    {short:<13}  {name:<20}  {done}/{total} tasks  {photos} photo(s)  {marker}",
        short = short_id(&room.room_id),
        name = room.room_name,
        total = room.tasks.len(),
        photos = room.photos.len(),
    )
    .trim_end()
    .to_string()
}

pub fn inspection_to_list_item(inspection: &InspectionSnapshot) -> InspectionListItem {
    let now_ms = Utc::now().timestamp_millis();
    InspectionListItem {
        id: inspection.id.clone(),
        property_name: inspection.property_name.clone(),
        property_id: inspection.property_id.clone(),
        status: inspection.status.to_string(),
        rooms_completed: inspection
            .rooms
            .iter()
            .filter(|room| room.status == RoomStatus::Completed)
            .count(),
        rooms_total: inspection.rooms.len(),
        created_at: inspection.created_at,
        last_modified: inspection.last_modified,
        relative_time: format_relative_time(inspection.last_modified, now_ms),
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(13).collect()
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn normalize_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyIdentifier)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn resolve_data_dir(cli_data_dir: Option<PathBuf>) -> PathBuf {
    cli_data_dir
        .or_else(|| env::var_os("SCRUB_DATA_DIR").map(PathBuf::from))
        .unwrap_or_else(default_data_dir)
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrub")
}

pub fn resolve_api_url(cli_api_url: Option<String>) -> Option<String> {
    cli_api_url
        .or_else(|| env::var("SCRUB_API_URL").ok())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

pub fn require_api_url(cli_api_url: Option<String>) -> Result<String, CliError> {
    resolve_api_url(cli_api_url).ok_or(CliError::ApiNotConfigured)
}
