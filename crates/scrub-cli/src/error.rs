use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] scrub_core::Error),
    #[error(transparent)]
    Api(#[from] scrub_core::api::ApiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Identifier cannot be empty")]
    EmptyIdentifier,
    #[error("No task description provided")]
    EmptyDescription,
    #[error("Inspection not found for id/prefix: {0}")]
    InspectionNotFound(String),
    #[error("Room not found for id/name: {0}")]
    RoomNotFound(String),
    #[error("Task not found for id/prefix: {0}")]
    TaskNotFound(String),
    #[error("Photo not found for id/prefix: {0}")]
    PhotoNotFound(String),
    #[error("Queued mutation not found for id/prefix: {0}")]
    MutationNotFound(String),
    #[error("{0}")]
    AmbiguousId(String),
    #[error("Offline; run `scrub sync` again once the connection is back")]
    Offline,
    #[error(
        "API URL is not configured. Pass --api-url or set SCRUB_API_URL to enable network commands."
    )]
    ApiNotConfigured,
}
