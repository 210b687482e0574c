//! Error types for scrub-core

use thiserror::Error;

/// Result type alias using scrub-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in scrub-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Inspection, room, task, or photo not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Room completion requirements not met
    #[error("Room not ready: {0}")]
    RoomNotReady(String),

    /// Malformed photo data URL
    #[error("Invalid image data: {0}")]
    InvalidImageData(String),
}
