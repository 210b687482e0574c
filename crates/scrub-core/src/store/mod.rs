//! Mutation queue and snapshot persistence
//!
//! Local state is exactly two named JSON records: the pending mutation
//! queue and the cached inspections. Both are loaded in full at open and
//! rewritten in full on every change. Storage problems never surface to
//! callers; they are logged and the in-memory copy stays authoritative
//! for the session.

mod json_file;
mod memory;
mod snapshot;

pub use json_file::JsonFileMutationStore;
pub use memory::MemoryMutationStore;
pub use snapshot::SnapshotStore;

use crate::models::{MutationId, MutationRecord, QueueUpdate};

/// File name of the durable mutation queue record
pub const QUEUE_FILE_NAME: &str = "pending-mutations.json";

/// File name of the cached inspections record
pub const SNAPSHOT_FILE_NAME: &str = "cached-inspections.json";

/// Trait for mutation queue storage operations
pub trait MutationStore: Send + Sync {
    /// Append a record to the queue
    fn enqueue(&self, record: MutationRecord);

    /// Full queue, ordered by enqueue time ascending
    fn list(&self) -> Vec<MutationRecord>;

    /// Apply a partial update to a record; `false` when the id is unknown
    fn update_by_id(&self, id: MutationId, update: QueueUpdate) -> bool;

    /// Remove a record; `false` when the id is unknown
    fn remove_by_id(&self, id: MutationId) -> bool;
}
