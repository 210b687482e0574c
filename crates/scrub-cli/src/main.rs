//! Scrub CLI - track cleaning inspections from the terminal
//!
//! Every edit lands in the local cache and mutation queue first, so the
//! tool stays fully usable offline; `sync` and `watch` replay the queue
//! once the API is reachable.

mod cli;
mod commands;
mod error;
#[cfg(test)]
mod tests;

use clap::{CommandFactory, Parser};

use crate::cli::{Cli, Commands, PhotoCommands, QueueCommands, RoomCommands, TaskCommands};
use crate::commands::common::{require_api_url, resolve_api_url, resolve_data_dir};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scrub_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir);

    match cli.command {
        Some(Commands::Status) => {
            commands::status::run_status(resolve_api_url(cli.api_url).as_deref(), &data_dir)
                .await?;
        }
        Some(Commands::Sync) => {
            commands::sync::run_sync(&require_api_url(cli.api_url)?, &data_dir).await?;
        }
        Some(Commands::Queue {
            command,
            limit,
            json,
        }) => match command {
            Some(QueueCommands::Drop { id }) => commands::queue::run_queue_drop(&id, &data_dir)?,
            None => commands::queue::run_queue_list(limit, json, &data_dir)?,
        },
        Some(Commands::Watch { interval }) => {
            commands::watch::run_watch(interval, &require_api_url(cli.api_url)?, &data_dir).await?;
        }
        Some(Commands::Start {
            property_name,
            property_id,
            rooms,
        }) => {
            commands::start::run_start(&property_name, property_id, &rooms, &data_dir)?;
        }
        Some(Commands::Task { command }) => match command {
            TaskCommands::Add {
                inspection,
                room,
                description,
            } => {
                commands::task::run_task_add(&inspection, &room, &description, &data_dir)?;
            }
            TaskCommands::Done {
                inspection,
                room,
                task,
            } => {
                commands::task::run_task_set_done(&inspection, &room, &task, true, &data_dir)?;
            }
            TaskCommands::Undo {
                inspection,
                room,
                task,
            } => {
                commands::task::run_task_set_done(&inspection, &room, &task, false, &data_dir)?;
            }
        },
        Some(Commands::Room { command }) => match command {
            RoomCommands::Note {
                inspection,
                room,
                note,
            } => {
                commands::room::run_room_note(&inspection, &room, &note, &data_dir)?;
            }
            RoomCommands::Complete { inspection, room } => {
                commands::room::run_room_complete(&inspection, &room, &data_dir)?;
            }
        },
        Some(Commands::Photo { command }) => match command {
            PhotoCommands::Add {
                inspection,
                room,
                files,
            } => {
                commands::photo::run_photo_add(&inspection, &room, &files, &data_dir)?;
            }
            PhotoCommands::Delete {
                inspection,
                room,
                photo,
            } => {
                commands::photo::run_photo_delete(&inspection, &room, &photo, &data_dir)?;
            }
        },
        Some(Commands::Inspections { json }) => {
            commands::inspections::run_inspections(json, &data_dir)?;
        }
        Some(Commands::Completions { shell, output }) => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help().map_err(CliError::Io)?;
            println!();
        }
    }

    Ok(())
}
