//! scrub-core - Core library for Scrub
//!
//! This crate contains the offline mutation queue, network monitoring,
//! sync engine, and inspection models used by the Scrub interfaces.

pub mod api;
pub mod error;
pub mod media;
pub mod models;
pub mod net;
pub mod offline;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{InspectionSnapshot, MutationId, MutationRecord};
