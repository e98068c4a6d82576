//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod display;
mod job;
mod live;
mod vod;

pub use job::JobCommands;
pub use live::LiveCommands;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::de::DeserializeOwned;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Single job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Encode a title and generate its manifests
    Vod {
        /// Path to a JSON file with the encoding and manifest requests
        #[arg(short, long)]
        request: String,
    },
    /// Live encoding management
    Live {
        #[command(subcommand)]
        command: LiveCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Vod { request } => vod::run_vod(&request, config).await,
        Commands::Live { command } => live::handle_live_command(command, config).await,
    }
}

/// Read and parse a JSON file
fn read_json<T: DeserializeOwned>(path: &str) -> Result<T> {
    let path = Path::new(path);
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}
