//! CLI command implementations

pub mod common;
pub mod completions;
pub mod inspections;
pub mod photo;
pub mod queue;
pub mod room;
pub mod start;
pub mod status;
pub mod sync;
pub mod task;
pub mod watch;
