//! Data models for Scrub

mod inspection;
mod mutation;

pub use inspection::{
    InspectionSnapshot, InspectionStatus, PhotoRecord, RoomSnapshot, RoomStatus, TaskItem,
};
pub use mutation::{
    MutationAction, MutationId, MutationKind, MutationPayload, MutationRecord, MutationState,
    QueueUpdate, RETRY_LIMIT,
};
