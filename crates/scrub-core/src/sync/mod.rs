//! Sync engine: drains the mutation queue against the remote API
//!
//! One pass at a time, oldest record first, bounded retry. Connectivity
//! is rechecked before every record so a dropped connection halts the
//! pass without touching the remainder of the queue. Failures are
//! contained per record; a pass never rolls anything back.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::{ApiError, PhotoUpload, RemoteApi, RoomUpdate};
use crate::media;
use crate::models::{MutationPayload, MutationRecord, MutationState, QueueUpdate};
use crate::net::{NetworkMonitor, NetworkStatus};
use crate::store::MutationStore;
use crate::util::unix_timestamp_ms;

/// Counts of queued mutations by replay eligibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueTotals {
    /// Waiting for their first attempt
    pub pending: usize,
    /// Failed but still under the retry ceiling
    pub retryable: usize,
    /// Failed at the retry ceiling; skipped by passes until removed
    pub exhausted: usize,
}

impl QueueTotals {
    /// Records a pass would currently attempt
    #[must_use]
    pub const fn eligible(&self) -> usize {
        self.pending + self.retryable
    }

    /// Everything still sitting in the queue
    #[must_use]
    pub const fn total(&self) -> usize {
        self.pending + self.retryable + self.exhausted
    }
}

/// Per-pass counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    /// Records the pass tried to replay
    pub attempted: usize,
    /// Replayed successfully and removed from the queue
    pub synced: usize,
    /// Marked failed with an incremented retry count
    pub failed: usize,
    /// True when connectivity dropped mid-pass
    pub halted_offline: bool,
}

/// What a requested sync pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Pass ran over the eligible queue (possibly halting mid-way)
    Completed(PassSummary),
    /// Offline before any record was attempted
    Offline,
    /// Another pass already held the guard; trigger ignored
    AlreadyRunning,
}

/// Completed-pass record kept in memory for status surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastPass {
    /// When the pass finished (Unix ms)
    pub finished_at: i64,
    /// What it did
    pub summary: PassSummary,
}

/// Replays queued mutations against the remote API
pub struct SyncEngine {
    store: Arc<dyn MutationStore>,
    api: Arc<dyn RemoteApi>,
    monitor: Arc<dyn NetworkMonitor>,
    pass_guard: Mutex<()>,
    last_pass: std::sync::Mutex<Option<LastPass>>,
}

impl SyncEngine {
    /// Create an engine over the given store, API client, and monitor
    #[must_use]
    pub fn new(
        store: Arc<dyn MutationStore>,
        api: Arc<dyn RemoteApi>,
        monitor: Arc<dyn NetworkMonitor>,
    ) -> Self {
        Self {
            store,
            api,
            monitor,
            pass_guard: Mutex::new(()),
            last_pass: std::sync::Mutex::new(None),
        }
    }

    /// Eligibility counts for status surfaces
    #[must_use]
    pub fn queue_totals(&self) -> QueueTotals {
        queue_totals(&self.store.list())
    }

    /// The most recent completed pass, if any ran this session
    #[must_use]
    pub fn last_pass(&self) -> Option<LastPass> {
        self.last_pass.lock().ok().and_then(|slot| *slot)
    }

    /// Run one sync pass unless one is already running
    ///
    /// Replays eligible records oldest first. Each record is marked
    /// `IN_FLIGHT` before dispatch, removed on success, and marked
    /// `FAILED` with an incremented retry count on failure.
    pub async fn run_pass(&self) -> PassOutcome {
        let Ok(_guard) = self.pass_guard.try_lock() else {
            tracing::debug!("sync pass already running, ignoring trigger");
            return PassOutcome::AlreadyRunning;
        };
        if self.monitor.current_status() == NetworkStatus::Offline {
            tracing::debug!("offline, not starting sync pass");
            return PassOutcome::Offline;
        }

        let mut eligible: Vec<MutationRecord> = self
            .store
            .list()
            .into_iter()
            .filter(MutationRecord::is_eligible)
            .collect();
        eligible.sort_by_key(|record| record.enqueued_at);

        if eligible.is_empty() {
            tracing::debug!("queue empty, nothing to sync");
        } else {
            tracing::info!(eligible = eligible.len(), "starting sync pass");
        }

        let mut summary = PassSummary::default();
        for record in eligible {
            if self.monitor.current_status() == NetworkStatus::Offline {
                tracing::warn!("went offline mid-pass, halting");
                summary.halted_offline = true;
                break;
            }

            summary.attempted += 1;
            self.store.update_by_id(
                record.id,
                QueueUpdate {
                    state: Some(MutationState::InFlight),
                    retry_count: None,
                },
            );

            match self.replay(&record).await {
                Ok(()) => {
                    self.store.remove_by_id(record.id);
                    summary.synced += 1;
                    tracing::info!(
                        id = %record.id,
                        kind = %record.kind,
                        action = %record.action,
                        "mutation synced"
                    );
                }
                Err(error) => {
                    let retry_count = record.retry_count + 1;
                    self.store.update_by_id(
                        record.id,
                        QueueUpdate {
                            state: Some(MutationState::Failed),
                            retry_count: Some(retry_count),
                        },
                    );
                    summary.failed += 1;
                    tracing::warn!(
                        id = %record.id,
                        kind = %record.kind,
                        retry_count,
                        %error,
                        "mutation failed"
                    );
                }
            }
        }

        let finished = LastPass {
            finished_at: unix_timestamp_ms(),
            summary,
        };
        if let Ok(mut slot) = self.last_pass.lock() {
            *slot = Some(finished);
        }
        tracing::info!(
            synced = summary.synced,
            failed = summary.failed,
            halted = summary.halted_offline,
            "sync pass finished"
        );
        PassOutcome::Completed(summary)
    }

    /// Run a pass on every offline-to-online transition
    ///
    /// Returns when the monitor's channel closes.
    pub async fn run_on_reconnect(&self) {
        let mut rx = self.monitor.subscribe();
        let mut previous = *rx.borrow();
        while rx.changed().await.is_ok() {
            let current = *rx.borrow_and_update();
            if previous == NetworkStatus::Offline && current == NetworkStatus::Online {
                tracing::info!("back online, starting sync pass");
                self.run_pass().await;
            }
            previous = current;
        }
    }

    async fn replay(&self, record: &MutationRecord) -> Result<(), ApiError> {
        match &record.payload {
            MutationPayload::Inspection { inspection } => {
                self.api.upsert_inspection(inspection).await
            }
            MutationPayload::Room {
                inspection_id,
                room,
            } => {
                let update = RoomUpdate {
                    tasks: room.tasks.clone(),
                    notes: room.notes.clone(),
                };
                self.api
                    .update_room(inspection_id, &room.room_id, &update)
                    .await
            }
            MutationPayload::PhotoUpload {
                inspection_id,
                room_id,
                photo,
            } => {
                let image = media::decode_data_url(&photo.data_url)
                    .map_err(|error| ApiError::InvalidPayload(error.to_string()))?;
                let upload = PhotoUpload {
                    photo_id: photo.id.clone(),
                    file_name: photo.file_name.clone(),
                    mime: image.mime,
                    bytes: image.bytes,
                };
                self.api.upload_photo(inspection_id, room_id, upload).await
            }
            MutationPayload::PhotoDelete {
                inspection_id,
                room_id,
                photo_id,
            } => match self.api.delete_photo(inspection_id, room_id, photo_id).await {
                Err(error) if error.is_not_found() => {
                    tracing::debug!(%photo_id, "photo already gone remotely, treating as synced");
                    Ok(())
                }
                result => result,
            },
        }
    }
}

/// Bucket queued records by replay eligibility
#[must_use]
pub fn queue_totals(records: &[MutationRecord]) -> QueueTotals {
    let mut totals = QueueTotals::default();
    for record in records {
        if record.is_exhausted() {
            totals.exhausted += 1;
        } else if record.state == MutationState::Failed {
            totals.retryable += 1;
        } else {
            totals.pending += 1;
        }
    }
    totals
}
