//! Durable JSON-file mutation store

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::models::{MutationId, MutationRecord, MutationState, QueueUpdate};

use super::MutationStore;

/// Durable queue backed by one JSON file, rewritten in full on every change
pub struct JsonFileMutationStore {
    path: PathBuf,
    records: Mutex<Vec<MutationRecord>>,
}

impl JsonFileMutationStore {
    /// Open the queue file, creating parent directories as needed
    ///
    /// Records left `IN_FLIGHT` by an interrupted pass are demoted to
    /// `PENDING`. An unreadable or corrupt file starts the queue empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let (records, recovered) = load_records(&path);
        let store = Self {
            path,
            records: Mutex::new(records),
        };
        if recovered {
            let records = store.records();
            store.persist(&records);
        }
        Ok(store)
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn records(&self) -> MutexGuard<'_, Vec<MutationRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, records: &[MutationRecord]) {
        if let Err(error) = write_records(&self.path, records) {
            tracing::error!(
                path = %self.path.display(),
                %error,
                "failed to persist mutation queue"
            );
        }
    }
}

impl MutationStore for JsonFileMutationStore {
    fn enqueue(&self, record: MutationRecord) {
        let mut records = self.records();
        records.push(record);
        self.persist(&records);
    }

    fn list(&self) -> Vec<MutationRecord> {
        let mut records = self.records().clone();
        records.sort_by_key(|record| record.enqueued_at);
        records
    }

    fn update_by_id(&self, id: MutationId, update: QueueUpdate) -> bool {
        let mut records = self.records();
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            tracing::warn!(%id, "mutation not found for update");
            return false;
        };
        if let Some(state) = update.state {
            record.state = state;
        }
        if let Some(retry_count) = update.retry_count {
            record.retry_count = retry_count;
        }
        self.persist(&records);
        true
    }

    fn remove_by_id(&self, id: MutationId) -> bool {
        let mut records = self.records();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            tracing::warn!(%id, "mutation not found for removal");
            return false;
        }
        self.persist(&records);
        true
    }
}

fn load_records(path: &Path) -> (Vec<MutationRecord>, bool) {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return (Vec::new(), false),
        Err(error) => {
            tracing::error!(
                path = %path.display(),
                %error,
                "failed to read mutation queue, starting empty"
            );
            return (Vec::new(), false);
        }
    };
    let mut records: Vec<MutationRecord> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!(
                path = %path.display(),
                %error,
                "corrupt mutation queue, starting empty"
            );
            return (Vec::new(), false);
        }
    };
    let mut recovered = false;
    for record in &mut records {
        if record.state == MutationState::InFlight {
            tracing::warn!(id = %record.id, "demoting interrupted mutation to pending");
            record.state = MutationState::Pending;
            recovered = true;
        }
    }
    (records, recovered)
}

fn write_records(path: &Path, records: &[MutationRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
