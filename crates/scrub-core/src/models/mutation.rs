//! Mutation queue model
//!
//! A mutation is one offline change awaiting replay against the remote
//! API. Records carry their own retry bookkeeping so the queue file is
//! self-describing across restarts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::inspection::{InspectionSnapshot, PhotoRecord, RoomSnapshot};

/// Maximum failed attempts before a mutation is excluded from automatic retry.
pub const RETRY_LIMIT: u32 = 3;

/// A unique identifier for a queued mutation, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MutationId(Uuid);

impl MutationId {
    /// Create a new unique mutation ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for MutationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MutationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Entity family a mutation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationKind {
    Inspection,
    Room,
    Photo,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inspection => write!(f, "INSPECTION"),
            Self::Room => write!(f, "ROOM"),
            Self::Photo => write!(f, "PHOTO"),
        }
    }
}

/// Remote operation a mutation performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Queue lifecycle state of a mutation
///
/// `IN_FLIGHT` only exists while a sync pass is replaying the record;
/// stores demote stale `IN_FLIGHT` records to `PENDING` on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationState {
    Pending,
    InFlight,
    Failed,
}

impl fmt::Display for MutationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::InFlight => write!(f, "IN_FLIGHT"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

/// The domain change a mutation carries
///
/// Tagged so stored queues stay readable, and so photo payloads keep
/// their base64 data isolated in dedicated variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MutationPayload {
    /// Full inspection snapshot, sent on create and update alike
    #[serde(rename_all = "camelCase")]
    Inspection { inspection: InspectionSnapshot },
    /// One room's checklist and notes
    #[serde(rename_all = "camelCase")]
    Room {
        inspection_id: String,
        room: RoomSnapshot,
    },
    /// One photo to upload, carried as a data URL
    #[serde(rename_all = "camelCase")]
    PhotoUpload {
        inspection_id: String,
        room_id: String,
        photo: PhotoRecord,
    },
    /// One photo to delete remotely
    #[serde(rename_all = "camelCase")]
    PhotoDelete {
        inspection_id: String,
        room_id: String,
        photo_id: String,
    },
}

impl MutationPayload {
    /// Entity family this payload belongs to
    #[must_use]
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Inspection { .. } => MutationKind::Inspection,
            Self::Room { .. } => MutationKind::Room,
            Self::PhotoUpload { .. } | Self::PhotoDelete { .. } => MutationKind::Photo,
        }
    }
}

/// A queued offline change awaiting replay against the remote API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    /// Unique identifier, assigned at enqueue time
    pub id: MutationId,
    /// Entity family, derived from the payload
    pub kind: MutationKind,
    /// Remote operation to perform
    pub action: MutationAction,
    /// The change itself
    pub payload: MutationPayload,
    /// Enqueue timestamp (Unix ms); replay order is ascending
    pub enqueued_at: i64,
    /// Failed replay attempts so far; only ever increases
    pub retry_count: u32,
    /// Queue lifecycle state
    pub state: MutationState,
}

impl MutationRecord {
    /// Create a pending record for the given action and payload
    #[must_use]
    pub fn new(action: MutationAction, payload: MutationPayload) -> Self {
        Self {
            id: MutationId::new(),
            kind: payload.kind(),
            action,
            payload,
            enqueued_at: crate::util::unix_timestamp_ms(),
            retry_count: 0,
            state: MutationState::Pending,
        }
    }

    /// Whether a sync pass may attempt this record
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        match self.state {
            MutationState::Pending => true,
            MutationState::Failed => self.retry_count < RETRY_LIMIT,
            MutationState::InFlight => false,
        }
    }

    /// Whether the record failed its way to the retry ceiling
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.state == MutationState::Failed && self.retry_count >= RETRY_LIMIT
    }
}

/// Partial update applied to a queued mutation by id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueUpdate {
    /// New lifecycle state, if changing
    pub state: Option<MutationState>,
    /// New retry count, if changing
    pub retry_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_inspection() -> InspectionSnapshot {
        InspectionSnapshot::new("Seaside Villa", None)
    }

    #[test]
    fn test_mutation_id_unique() {
        let id1 = MutationId::new();
        let id2 = MutationId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_mutation_id_parse() {
        let id = MutationId::new();
        let parsed: MutationId = id.as_str().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_record_new_defaults() {
        let record = MutationRecord::new(
            MutationAction::Create,
            MutationPayload::Inspection {
                inspection: sample_inspection(),
            },
        );
        assert_eq!(record.state, MutationState::Pending);
        assert_eq!(record.retry_count, 0);
        assert_eq!(record.kind, MutationKind::Inspection);
        assert!(record.enqueued_at > 0);
    }

    #[test]
    fn test_kind_follows_payload() {
        let upload = MutationPayload::PhotoUpload {
            inspection_id: "i1".to_string(),
            room_id: "r1".to_string(),
            photo: PhotoRecord::new("data:image/jpeg;base64,AA==", "door.jpg"),
        };
        let delete = MutationPayload::PhotoDelete {
            inspection_id: "i1".to_string(),
            room_id: "r1".to_string(),
            photo_id: "p1".to_string(),
        };
        assert_eq!(upload.kind(), MutationKind::Photo);
        assert_eq!(delete.kind(), MutationKind::Photo);
        assert_eq!(
            MutationPayload::Room {
                inspection_id: "i1".to_string(),
                room: RoomSnapshot::new("Kitchen"),
            }
            .kind(),
            MutationKind::Room
        );
    }

    #[test]
    fn test_eligibility_by_state_and_retries() {
        let mut record = MutationRecord::new(
            MutationAction::Update,
            MutationPayload::Inspection {
                inspection: sample_inspection(),
            },
        );
        assert!(record.is_eligible());

        record.state = MutationState::InFlight;
        assert!(!record.is_eligible());

        record.state = MutationState::Failed;
        record.retry_count = RETRY_LIMIT - 1;
        assert!(record.is_eligible());
        assert!(!record.is_exhausted());

        record.retry_count = RETRY_LIMIT;
        assert!(!record.is_eligible());
        assert!(record.is_exhausted());
    }

    #[test]
    fn test_state_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&MutationState::InFlight).unwrap(),
            "\"IN_FLIGHT\""
        );
        assert_eq!(
            serde_json::to_string(&MutationKind::Photo).unwrap(),
            "\"PHOTO\""
        );
        assert_eq!(
            serde_json::to_string(&MutationAction::Delete).unwrap(),
            "\"DELETE\""
        );
    }

    #[test]
    fn test_payload_tagging() {
        let payload = MutationPayload::PhotoDelete {
            inspection_id: "insp-1".to_string(),
            room_id: "room-1".to_string(),
            photo_id: "photo-1".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["target"], "PHOTO_DELETE");
        assert_eq!(json["inspectionId"], "insp-1");
        assert_eq!(json["photoId"], "photo-1");

        let back: MutationPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
    }
}
