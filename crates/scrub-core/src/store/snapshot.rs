//! Cached inspection snapshots

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::models::InspectionSnapshot;

/// Cached inspections backed by one JSON file
///
/// These are the working copies every offline edit lands in first,
/// kept with the same load-in-full/rewrite-in-full discipline as the
/// mutation queue.
pub struct SnapshotStore {
    path: Option<PathBuf>,
    inspections: Mutex<Vec<InspectionSnapshot>>,
}

impl SnapshotStore {
    /// Open the snapshot file, creating parent directories as needed
    ///
    /// An unreadable or corrupt file starts the cache empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let inspections = load_snapshots(&path);
        Ok(Self {
            path: Some(path),
            inspections: Mutex::new(inspections),
        })
    }

    /// Create a store with no backing file
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self {
            path: None,
            inspections: Mutex::new(Vec::new()),
        }
    }

    /// All cached inspections in stored order
    #[must_use]
    pub fn list(&self) -> Vec<InspectionSnapshot> {
        self.inspections().clone()
    }

    /// One cached inspection by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<InspectionSnapshot> {
        self.inspections()
            .iter()
            .find(|inspection| inspection.id == id)
            .cloned()
    }

    /// Insert or replace an inspection by id
    pub fn upsert(&self, inspection: InspectionSnapshot) {
        let mut inspections = self.inspections();
        match inspections
            .iter_mut()
            .find(|existing| existing.id == inspection.id)
        {
            Some(existing) => *existing = inspection,
            None => inspections.push(inspection),
        }
        self.persist(&inspections);
    }

    fn inspections(&self) -> MutexGuard<'_, Vec<InspectionSnapshot>> {
        self.inspections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, inspections: &[InspectionSnapshot]) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(error) = write_snapshots(path, inspections) {
            tracing::error!(
                path = %path.display(),
                %error,
                "failed to persist cached inspections"
            );
        }
    }
}

fn load_snapshots(path: &Path) -> Vec<InspectionSnapshot> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(error) => {
            tracing::error!(
                path = %path.display(),
                %error,
                "failed to read cached inspections, starting empty"
            );
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(inspections) => inspections,
        Err(error) => {
            tracing::error!(
                path = %path.display(),
                %error,
                "corrupt cached inspections, starting empty"
            );
            Vec::new()
        }
    }
}

fn write_snapshots(path: &Path, inspections: &[InspectionSnapshot]) -> Result<()> {
    let json = serde_json::to_string_pretty(inspections)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
