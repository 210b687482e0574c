//! Inspection snapshot models
//!
//! Local working copies of inspections, edited offline and replayed to
//! the server by the sync engine. Serialized camelCase to match the
//! cached-inspections record and the API wire format.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::util::unix_timestamp_ms;

/// Lifecycle of a cached inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionStatus {
    InProgress,
    Completed,
    PendingSync,
}

impl fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::PendingSync => write!(f, "PENDING_SYNC"),
        }
    }
}

/// Room checklist state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Pending,
    Completed,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// A single checklist item inside a room inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    /// Unique identifier
    pub id: String,
    /// What to check, e.g. "Clean lint trap"
    pub description: String,
    /// Checked off by the inspector
    pub completed: bool,
}

impl TaskItem {
    /// Create an unchecked task with a fresh id
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            description: description.into(),
            completed: false,
        }
    }
}

/// A photo attached as cleaning evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    /// Unique identifier
    pub id: String,
    /// `data:<mime>;base64,<payload>` string holding the image bytes
    pub data_url: String,
    /// Original file name, kept for the multipart upload
    pub file_name: String,
    /// Attach timestamp (Unix ms)
    pub timestamp: i64,
}

impl PhotoRecord {
    /// Create a photo record with a fresh id
    #[must_use]
    pub fn new(data_url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            data_url: data_url.into(),
            file_name: file_name.into(),
            timestamp: unix_timestamp_ms(),
        }
    }
}

/// Per-room checklist-and-photos unit nested under an inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Unique identifier of this room inspection
    pub id: String,
    /// Room identifier used in API paths
    pub room_id: String,
    /// Display name, e.g. "Kitchen"
    pub room_name: String,
    /// Cleaning checklist
    pub tasks: Vec<TaskItem>,
    /// Photo evidence
    pub photos: Vec<PhotoRecord>,
    /// Inspector notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Checklist state
    pub status: RoomStatus,
    /// Last local edit (Unix ms)
    pub last_modified: i64,
}

impl RoomSnapshot {
    /// Create an empty pending room, minting both identifiers locally
    #[must_use]
    pub fn new(room_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            room_id: Uuid::now_v7().to_string(),
            room_name: room_name.into(),
            tasks: Vec::new(),
            photos: Vec::new(),
            notes: None,
            status: RoomStatus::Pending,
            last_modified: unix_timestamp_ms(),
        }
    }

    /// Find a task by id
    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&TaskItem> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Find a task by id, mutably
    pub fn task_mut(&mut self, task_id: &str) -> Option<&mut TaskItem> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    /// Find a photo by id
    #[must_use]
    pub fn photo(&self, photo_id: &str) -> Option<&PhotoRecord> {
        self.photos.iter().find(|photo| photo.id == photo_id)
    }

    /// Every task checked and enough photo evidence attached
    #[must_use]
    pub fn is_ready_for_completion(&self, min_photos: usize) -> bool {
        self.tasks.iter().all(|task| task.completed) && self.photos.len() >= min_photos
    }
}

/// A locally cached inspection, the unit the offline service edits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSnapshot {
    /// Unique identifier
    pub id: String,
    /// Property identifier, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,
    /// Property display name
    pub property_name: String,
    /// Rooms under inspection
    pub rooms: Vec<RoomSnapshot>,
    /// Inspection lifecycle
    pub status: InspectionStatus,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last local edit (Unix ms)
    pub last_modified: i64,
}

impl InspectionSnapshot {
    /// Create an in-progress inspection with no rooms yet
    #[must_use]
    pub fn new(property_name: impl Into<String>, property_id: Option<String>) -> Self {
        let now = unix_timestamp_ms();
        Self {
            id: Uuid::now_v7().to_string(),
            property_id,
            property_name: property_name.into(),
            rooms: Vec::new(),
            status: InspectionStatus::InProgress,
            created_at: now,
            last_modified: now,
        }
    }

    /// Find a room by its room id or room-inspection id
    #[must_use]
    pub fn room(&self, ident: &str) -> Option<&RoomSnapshot> {
        self.rooms
            .iter()
            .find(|room| room.room_id == ident || room.id == ident)
    }

    /// Find a room by its room id or room-inspection id, mutably
    pub fn room_mut(&mut self, ident: &str) -> Option<&mut RoomSnapshot> {
        self.rooms
            .iter_mut()
            .find(|room| room.room_id == ident || room.id == ident)
    }

    /// Whether every room has been completed
    #[must_use]
    pub fn all_rooms_completed(&self) -> bool {
        !self.rooms.is_empty()
            && self
                .rooms
                .iter()
                .all(|room| room.status == RoomStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_inspection_defaults() {
        let inspection = InspectionSnapshot::new("Seaside Villa", Some("prop-1".to_string()));
        assert_eq!(inspection.status, InspectionStatus::InProgress);
        assert_eq!(inspection.property_name, "Seaside Villa");
        assert_eq!(inspection.created_at, inspection.last_modified);
        assert!(inspection.rooms.is_empty());
    }

    #[test]
    fn test_room_lookup_by_either_id() {
        let mut inspection = InspectionSnapshot::new("Seaside Villa", None);
        let room = RoomSnapshot::new("Kitchen");
        let room_id = room.room_id.clone();
        let inspection_room_id = room.id.clone();
        inspection.rooms.push(room);

        assert!(inspection.room(&room_id).is_some());
        assert!(inspection.room(&inspection_room_id).is_some());
        assert!(inspection.room("missing").is_none());
    }

    #[test]
    fn test_room_readiness() {
        let mut room = RoomSnapshot::new("Bathroom 1");
        room.tasks.push(TaskItem::new("Clean the mirror"));
        assert!(!room.is_ready_for_completion(2));

        room.tasks[0].completed = true;
        assert!(!room.is_ready_for_completion(2));

        room.photos
            .push(PhotoRecord::new("data:image/jpeg;base64,AA==", "a.jpg"));
        room.photos
            .push(PhotoRecord::new("data:image/jpeg;base64,AA==", "b.jpg"));
        assert!(room.is_ready_for_completion(2));
    }

    #[test]
    fn test_all_rooms_completed_requires_rooms() {
        let mut inspection = InspectionSnapshot::new("Seaside Villa", None);
        assert!(!inspection.all_rooms_completed());

        let mut room = RoomSnapshot::new("Kitchen");
        room.status = RoomStatus::Completed;
        inspection.rooms.push(room);
        assert!(inspection.all_rooms_completed());

        inspection.rooms.push(RoomSnapshot::new("Backyard"));
        assert!(!inspection.all_rooms_completed());
    }

    #[test]
    fn test_snapshot_json_is_camel_case() {
        let inspection = InspectionSnapshot::new("Seaside Villa", None);
        let json = serde_json::to_value(&inspection).unwrap();
        assert!(json.get("propertyName").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("lastModified").is_some());
        assert_eq!(json["status"], "IN_PROGRESS");
    }
}
