//! Offline edit service: snapshot updates paired with queued mutations
//!
//! Every edit lands in the cached snapshot first and enqueues the
//! mutation that will replay it remotely. The service never talks to
//! the network; draining the queue is the sync engine's job.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{
    InspectionSnapshot, InspectionStatus, MutationAction, MutationPayload, MutationRecord,
    PhotoRecord, RoomSnapshot, RoomStatus, TaskItem,
};
use crate::store::{MutationStore, SnapshotStore};
use crate::util::{normalize_text_option, unix_timestamp_ms};

/// Minimum photo evidence required to complete a room
pub const MIN_PHOTOS_PER_ROOM: usize = 2;

/// Coordinates cached inspections and the mutation queue
pub struct OfflineService {
    snapshots: SnapshotStore,
    queue: Arc<dyn MutationStore>,
}

impl OfflineService {
    /// Create a service over the given snapshot store and queue
    #[must_use]
    pub fn new(snapshots: SnapshotStore, queue: Arc<dyn MutationStore>) -> Self {
        Self { snapshots, queue }
    }

    /// Start a new inspection with the given rooms
    pub fn start_inspection(
        &self,
        property_name: &str,
        property_id: Option<String>,
        room_names: &[String],
    ) -> Result<InspectionSnapshot> {
        let property_name = property_name.trim();
        if property_name.is_empty() {
            return Err(Error::InvalidInput(
                "property name cannot be empty".to_string(),
            ));
        }
        let mut inspection =
            InspectionSnapshot::new(property_name, normalize_text_option(property_id));
        for name in room_names {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidInput("room name cannot be empty".to_string()));
            }
            inspection.rooms.push(RoomSnapshot::new(name));
        }
        Ok(self.save_inspection(inspection))
    }

    /// Upsert a snapshot and enqueue its create/update mutation
    ///
    /// Enqueues `CREATE` when the inspection is new locally, `UPDATE`
    /// when a cached copy already exists.
    pub fn save_inspection(&self, mut inspection: InspectionSnapshot) -> InspectionSnapshot {
        inspection.last_modified = unix_timestamp_ms();
        let action = if self.snapshots.get(&inspection.id).is_some() {
            MutationAction::Update
        } else {
            MutationAction::Create
        };
        self.snapshots.upsert(inspection.clone());
        self.queue.enqueue(MutationRecord::new(
            action,
            MutationPayload::Inspection {
                inspection: inspection.clone(),
            },
        ));
        tracing::debug!(id = %inspection.id, %action, "inspection saved offline");
        inspection
    }

    /// Upsert one room wholesale
    ///
    /// Enqueues `CREATE` when the room id is new to the inspection,
    /// `UPDATE` when it replaces an existing room.
    pub fn update_room(&self, inspection_id: &str, mut room: RoomSnapshot) -> Result<RoomSnapshot> {
        let mut inspection = self.get_required(inspection_id)?;
        let now = unix_timestamp_ms();
        room.last_modified = now;
        let action = match inspection
            .rooms
            .iter_mut()
            .find(|existing| existing.room_id == room.room_id)
        {
            Some(existing) => {
                *existing = room.clone();
                MutationAction::Update
            }
            None => {
                inspection.rooms.push(room.clone());
                MutationAction::Create
            }
        };
        inspection.last_modified = now;
        self.snapshots.upsert(inspection);
        self.queue.enqueue(MutationRecord::new(
            action,
            MutationPayload::Room {
                inspection_id: inspection_id.to_string(),
                room: room.clone(),
            },
        ));
        Ok(room)
    }

    /// Append a checklist task to a room
    pub fn add_task(
        &self,
        inspection_id: &str,
        room_ident: &str,
        description: &str,
    ) -> Result<TaskItem> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::InvalidInput(
                "task description cannot be empty".to_string(),
            ));
        }
        let task = TaskItem::new(description);
        let added = task.clone();
        self.edit_room(inspection_id, room_ident, move |room| {
            room.tasks.push(task);
            Ok(())
        })?;
        Ok(added)
    }

    /// Check a task off, or uncheck it
    pub fn set_task_done(
        &self,
        inspection_id: &str,
        room_ident: &str,
        task_id: &str,
        completed: bool,
    ) -> Result<()> {
        self.edit_room(inspection_id, room_ident, |room| {
            let task = room
                .task_mut(task_id)
                .ok_or_else(|| Error::NotFound(format!("task {task_id}")))?;
            task.completed = completed;
            Ok(())
        })?;
        Ok(())
    }

    /// Set or clear a room's notes
    pub fn set_room_notes(
        &self,
        inspection_id: &str,
        room_ident: &str,
        notes: Option<String>,
    ) -> Result<()> {
        self.edit_room(inspection_id, room_ident, |room| {
            room.notes = normalize_text_option(notes);
            Ok(())
        })?;
        Ok(())
    }

    /// Attach photos to a room, one queued upload per photo
    ///
    /// A photo whose id already exists replaces the cached copy and is
    /// queued as `UPDATE`; new photos are queued as `CREATE`.
    pub fn save_photos(
        &self,
        inspection_id: &str,
        room_ident: &str,
        photos: Vec<PhotoRecord>,
    ) -> Result<()> {
        if photos.is_empty() {
            return Ok(());
        }
        let mut inspection = self.get_required(inspection_id)?;
        let now = unix_timestamp_ms();
        let (room_id, queued) = {
            let room = Self::room_required(&mut inspection, room_ident)?;
            let mut queued = Vec::with_capacity(photos.len());
            for photo in photos {
                let action = match room.photos.iter_mut().find(|existing| existing.id == photo.id)
                {
                    Some(existing) => {
                        *existing = photo.clone();
                        MutationAction::Update
                    }
                    None => {
                        room.photos.push(photo.clone());
                        MutationAction::Create
                    }
                };
                queued.push((action, photo));
            }
            room.last_modified = now;
            (room.room_id.clone(), queued)
        };
        inspection.last_modified = now;
        self.snapshots.upsert(inspection);
        for (action, photo) in queued {
            self.queue.enqueue(MutationRecord::new(
                action,
                MutationPayload::PhotoUpload {
                    inspection_id: inspection_id.to_string(),
                    room_id: room_id.clone(),
                    photo,
                },
            ));
        }
        Ok(())
    }

    /// Remove a photo locally and enqueue its remote delete
    pub fn delete_photo(
        &self,
        inspection_id: &str,
        room_ident: &str,
        photo_id: &str,
    ) -> Result<()> {
        let mut inspection = self.get_required(inspection_id)?;
        let now = unix_timestamp_ms();
        let room_id = {
            let room = Self::room_required(&mut inspection, room_ident)?;
            if room.photo(photo_id).is_none() {
                return Err(Error::NotFound(format!("photo {photo_id}")));
            }
            room.photos.retain(|photo| photo.id != photo_id);
            room.last_modified = now;
            room.room_id.clone()
        };
        inspection.last_modified = now;
        self.snapshots.upsert(inspection);
        self.queue.enqueue(MutationRecord::new(
            MutationAction::Delete,
            MutationPayload::PhotoDelete {
                inspection_id: inspection_id.to_string(),
                room_id,
                photo_id: photo_id.to_string(),
            },
        ));
        Ok(())
    }

    /// Complete a room once every task is checked and photo evidence is in
    ///
    /// The completed checklist is enqueued as a room update; completion
    /// status itself is local state.
    pub fn complete_room(&self, inspection_id: &str, room_ident: &str) -> Result<RoomSnapshot> {
        let mut inspection = self.get_required(inspection_id)?;
        let now = unix_timestamp_ms();
        let room_snapshot = {
            let room = Self::room_required(&mut inspection, room_ident)?;
            let unchecked = room.tasks.iter().filter(|task| !task.completed).count();
            if unchecked > 0 {
                return Err(Error::RoomNotReady(format!(
                    "{unchecked} task(s) still unchecked"
                )));
            }
            if room.photos.len() < MIN_PHOTOS_PER_ROOM {
                return Err(Error::RoomNotReady(format!(
                    "need at least {MIN_PHOTOS_PER_ROOM} photos, have {}",
                    room.photos.len()
                )));
            }
            room.status = RoomStatus::Completed;
            room.last_modified = now;
            room.clone()
        };
        if inspection.all_rooms_completed() {
            inspection.status = InspectionStatus::Completed;
        }
        inspection.last_modified = now;
        self.snapshots.upsert(inspection);
        self.queue.enqueue(MutationRecord::new(
            MutationAction::Update,
            MutationPayload::Room {
                inspection_id: inspection_id.to_string(),
                room: room_snapshot.clone(),
            },
        ));
        Ok(room_snapshot)
    }

    /// All cached inspections
    #[must_use]
    pub fn list_inspections(&self) -> Vec<InspectionSnapshot> {
        self.snapshots.list()
    }

    /// One cached inspection by id
    #[must_use]
    pub fn get_inspection(&self, id: &str) -> Option<InspectionSnapshot> {
        self.snapshots.get(id)
    }

    fn get_required(&self, inspection_id: &str) -> Result<InspectionSnapshot> {
        self.snapshots
            .get(inspection_id)
            .ok_or_else(|| Error::NotFound(format!("inspection {inspection_id}")))
    }

    fn room_required<'a>(
        inspection: &'a mut InspectionSnapshot,
        room_ident: &str,
    ) -> Result<&'a mut RoomSnapshot> {
        inspection
            .room_mut(room_ident)
            .ok_or_else(|| Error::NotFound(format!("room {room_ident}")))
    }

    fn edit_room<F>(&self, inspection_id: &str, room_ident: &str, edit: F) -> Result<RoomSnapshot>
    where
        F: FnOnce(&mut RoomSnapshot) -> Result<()>,
    {
        let mut inspection = self.get_required(inspection_id)?;
        let now = unix_timestamp_ms();
        let room_snapshot = {
            let room = Self::room_required(&mut inspection, room_ident)?;
            edit(room)?;
            room.last_modified = now;
            room.clone()
        };
        inspection.last_modified = now;
        self.snapshots.upsert(inspection);
        self.queue.enqueue(MutationRecord::new(
            MutationAction::Update,
            MutationPayload::Room {
                inspection_id: inspection_id.to_string(),
                room: room_snapshot.clone(),
            },
        ));
        Ok(room_snapshot)
    }
}
