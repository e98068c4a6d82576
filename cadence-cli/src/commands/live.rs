//! Live encoding command handlers

use anyhow::{Context, Result};
use cadence_core::domain::job::{JobDescription, JobId, JobKind};
use cadence_orchestrator::{JobHandle, LiveWorkflow};
use clap::Subcommand;
use colored::*;

use super::display::print_failure;
use super::read_json;
use crate::config::Config;

/// Default SRT listener port on the encoder
const SRT_PORT: u16 = 2088;

/// Live subcommands
#[derive(Subcommand)]
pub enum LiveCommands {
    /// Start a live encoding and keep it running until Ctrl-C
    Start {
        /// Live encoding ID
        id: String,

        /// Path to the start request JSON file
        #[arg(short, long)]
        request: String,
    },
    /// Stop a running live encoding
    Stop {
        /// Live encoding ID
        id: String,
    },
}

/// Handle live commands
pub async fn handle_live_command(command: LiveCommands, config: &Config) -> Result<()> {
    match command {
        LiveCommands::Start { id, request } => start_live(config, JobId::new(id), &request).await,
        LiveCommands::Stop { id } => stop_live(config, JobId::new(id)).await,
    }
}

async fn start_live(config: &Config, id: JobId, request_path: &str) -> Result<()> {
    let description: JobDescription = read_json(request_path)?;
    let workflow = LiveWorkflow::new(config.orchestrator()?);

    println!("{}", format!("Starting live encoding {}...", id).dimmed());
    let mut session = match workflow.start(id, &description).await {
        Ok(session) => session,
        Err(e) => {
            print_failure(&e);
            return Err(e.into());
        }
    };

    println!("{}", "✓ Live encoding running".green().bold());
    println!("  ID:         {}", session.handle.id().to_string().cyan());
    println!("  RTMP:       {}", session.details.rtmp_url());
    println!("  SRT:        {}", session.details.srt_url(SRT_PORT));
    println!("  Stream key: {}", session.details.stream_key);
    println!();
    println!("{}", "Press Ctrl-C to stop the encoding".dimmed());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    println!("{}", "Stopping live encoding...".dimmed());
    workflow.shutdown(&mut session).await?;
    println!("{}", "✓ Live encoding stopped".green().bold());
    Ok(())
}

async fn stop_live(config: &Config, id: JobId) -> Result<()> {
    let orchestrator = config.orchestrator()?;
    let policy = orchestrator.policy();
    let mut handle = JobHandle::attach(JobKind::LiveEncoding, id);

    if let Err(e) = orchestrator.stop(&mut handle, &policy).await {
        print_failure(&e);
        return Err(e.into());
    }

    println!("{}", "✓ Live encoding stopped".green().bold());
    Ok(())
}
