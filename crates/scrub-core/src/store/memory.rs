//! In-memory mutation store

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::{MutationId, MutationRecord, QueueUpdate};

use super::MutationStore;

/// In-memory queue for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryMutationStore {
    records: Mutex<Vec<MutationRecord>>,
}

impl MemoryMutationStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> MutexGuard<'_, Vec<MutationRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MutationStore for MemoryMutationStore {
    fn enqueue(&self, record: MutationRecord) {
        self.records().push(record);
    }

    fn list(&self) -> Vec<MutationRecord> {
        let mut records = self.records().clone();
        records.sort_by_key(|record| record.enqueued_at);
        records
    }

    fn update_by_id(&self, id: MutationId, update: QueueUpdate) -> bool {
        let mut records = self.records();
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return false;
        };
        if let Some(state) = update.state {
            record.state = state;
        }
        if let Some(retry_count) = update.retry_count {
            record.retry_count = retry_count;
        }
        true
    }

    fn remove_by_id(&self, id: MutationId) -> bool {
        let mut records = self.records();
        let before = records.len();
        records.retain(|record| record.id != id);
        records.len() < before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InspectionSnapshot, MutationAction, MutationPayload, MutationState};
    use pretty_assertions::assert_eq;

    fn record_at(enqueued_at: i64) -> MutationRecord {
        let mut record = MutationRecord::new(
            MutationAction::Create,
            MutationPayload::Inspection {
                inspection: InspectionSnapshot::new("Seaside Villa", None),
            },
        );
        record.enqueued_at = enqueued_at;
        record
    }

    #[test]
    fn test_list_sorted_by_enqueue_time() {
        let store = MemoryMutationStore::new();
        store.enqueue(record_at(3_000));
        store.enqueue(record_at(1_000));
        store.enqueue(record_at(2_000));

        let times: Vec<i64> = store.list().iter().map(|r| r.enqueued_at).collect();
        assert_eq!(times, vec![1_000, 2_000, 3_000]);
    }

    #[test]
    fn test_update_by_id() {
        let store = MemoryMutationStore::new();
        let record = record_at(1_000);
        let id = record.id;
        store.enqueue(record);

        let updated = store.update_by_id(
            id,
            QueueUpdate {
                state: Some(MutationState::Failed),
                retry_count: Some(2),
            },
        );
        assert!(updated);

        let listed = store.list();
        assert_eq!(listed[0].state, MutationState::Failed);
        assert_eq!(listed[0].retry_count, 2);
    }

    #[test]
    fn test_update_missing_returns_false() {
        let store = MemoryMutationStore::new();
        assert!(!store.update_by_id(MutationId::new(), QueueUpdate::default()));
    }

    #[test]
    fn test_remove_by_id() {
        let store = MemoryMutationStore::new();
        let record = record_at(1_000);
        let id = record.id;
        store.enqueue(record);

        assert!(store.remove_by_id(id));
        assert!(store.list().is_empty());
        assert!(!store.remove_by_id(id));
    }
}
