use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use scrub_core::net::DEFAULT_PROBE_INTERVAL;

#[derive(Parser)]
#[command(name = "scrub")]
#[command(about = "Track cleaning inspections from the command line, online or not")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to the local data directory
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the inspection API
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show network status and queued work
    Status,
    /// Replay queued mutations against the API now
    Sync,
    /// Inspect the pending mutation queue
    Queue {
        #[command(subcommand)]
        command: Option<QueueCommands>,
        /// Number of records to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keep a connectivity watcher running and sync on reconnect
    Watch {
        /// Probe interval in seconds
        #[arg(short, long, default_value_t = DEFAULT_PROBE_INTERVAL.as_secs(), value_name = "SECONDS")]
        interval: u64,
    },
    /// Start a new inspection
    #[command(alias = "new")]
    Start {
        /// Property display name
        property_name: String,
        /// Optional property identifier
        #[arg(long, value_name = "ID")]
        property_id: Option<String>,
        /// Room to inspect (repeatable)
        #[arg(short, long = "room", value_name = "NAME")]
        rooms: Vec<String>,
    },
    /// Manage a room's checklist
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Edit or complete a room
    Room {
        #[command(subcommand)]
        command: RoomCommands,
    },
    /// Attach or remove photo evidence
    Photo {
        #[command(subcommand)]
        command: PhotoCommands,
    },
    /// List cached inspections
    Inspections {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum QueueCommands {
    /// Remove a queued mutation without replaying it
    Drop {
        /// Mutation ID or unique ID prefix
        id: String,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a checklist task to a room
    Add {
        /// Inspection ID or unique ID prefix
        inspection: String,
        /// Room ID, ID prefix, or room name
        room: String,
        /// Task description
        description: Vec<String>,
    },
    /// Check a task off
    Done {
        /// Inspection ID or unique ID prefix
        inspection: String,
        /// Room ID, ID prefix, or room name
        room: String,
        /// Task ID or unique ID prefix
        task: String,
    },
    /// Uncheck a task
    Undo {
        /// Inspection ID or unique ID prefix
        inspection: String,
        /// Room ID, ID prefix, or room name
        room: String,
        /// Task ID or unique ID prefix
        task: String,
    },
}

#[derive(Subcommand)]
pub enum RoomCommands {
    /// Set or clear a room's notes
    Note {
        /// Inspection ID or unique ID prefix
        inspection: String,
        /// Room ID, ID prefix, or room name
        room: String,
        /// Note text (empty clears the notes)
        note: Vec<String>,
    },
    /// Mark a room completed once its checklist and photos are in
    Complete {
        /// Inspection ID or unique ID prefix
        inspection: String,
        /// Room ID, ID prefix, or room name
        room: String,
    },
}

#[derive(Subcommand)]
pub enum PhotoCommands {
    /// Attach photo files to a room
    Add {
        /// Inspection ID or unique ID prefix
        inspection: String,
        /// Room ID, ID prefix, or room name
        room: String,
        /// Image files to attach
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },
    /// Remove a photo and queue its remote delete
    Delete {
        /// Inspection ID or unique ID prefix
        inspection: String,
        /// Room ID, ID prefix, or room name
        room: String,
        /// Photo ID or unique ID prefix
        photo: String,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
