//! Job command handlers
//!
//! Submits single jobs, queries their status and waits for them to settle.

use anyhow::Result;
use cadence_core::domain::job::{JobDescription, JobId, JobKind};
use cadence_orchestrator::JobHandle;
use clap::Subcommand;
use colored::*;

use super::display::{print_failure, print_handle, print_report};
use super::read_json;
use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Submit a job from a JSON description
    Submit {
        /// Job kind (encoding, hls, dash)
        kind: JobKind,

        /// Path to the job description JSON file
        #[arg(short, long)]
        file: String,

        /// Poll until the job settles
        #[arg(short, long)]
        wait: bool,
    },
    /// Show the current status of a job
    Status {
        /// Job kind (encoding, hls, dash, live)
        kind: JobKind,
        /// Job ID
        id: String,
    },
    /// Poll a job until it is FINISHED or ERROR
    Wait {
        /// Job kind (encoding, hls, dash, live)
        kind: JobKind,
        /// Job ID
        id: String,
    },
    /// List the artifacts a job produced
    Outputs {
        /// Job kind (encoding, hls, dash)
        kind: JobKind,
        /// Job ID
        id: String,
    },
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    match command {
        JobCommands::Submit { kind, file, wait } => submit_job(config, kind, &file, wait).await,
        JobCommands::Status { kind, id } => show_status(config, kind, JobId::new(id)).await,
        JobCommands::Wait { kind, id } => {
            wait_for_job(config, JobHandle::attach(kind, JobId::new(id))).await
        }
        JobCommands::Outputs { kind, id } => list_outputs(config, kind, JobId::new(id)).await,
    }
}

/// Submit a job and optionally wait for it
async fn submit_job(config: &Config, kind: JobKind, file: &str, wait: bool) -> Result<()> {
    let description: JobDescription = read_json(file)?;
    let orchestrator = config.orchestrator()?;

    let handle = orchestrator.submit(kind, &description).await?;
    println!("{}", "✓ Job submitted".green().bold());
    println!("  ID:   {}", handle.id().to_string().cyan());
    println!("  Kind: {}", kind);

    if wait {
        println!();
        wait_for_job(config, handle).await?;
    }

    Ok(())
}

/// Fetch and display one status snapshot
async fn show_status(config: &Config, kind: JobKind, id: JobId) -> Result<()> {
    let client = config.client()?;
    let report = client.get_status(kind, &id).await?;

    println!("{}", format!("{} job {}:", kind, id).bold());
    print_report(&report);
    Ok(())
}

/// Poll a job to a terminal state
async fn wait_for_job(config: &Config, mut handle: JobHandle) -> Result<()> {
    let orchestrator = config.orchestrator()?;
    let policy = orchestrator.policy();

    println!(
        "{}",
        format!("Waiting for {} job {}...", handle.kind(), handle.id()).dimmed()
    );

    match orchestrator.poll_until_terminal(&mut handle, &policy).await {
        Ok(report) => {
            println!("{}", "✓ Job finished".green().bold());
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            print_failure(&e);
            print_handle(&handle);
            Err(e.into())
        }
    }
}

/// List the outputs of a job
async fn list_outputs(config: &Config, kind: JobKind, id: JobId) -> Result<()> {
    let client = config.client()?;
    let outputs = client.get_outputs(kind, &id).await?;

    if outputs.is_empty() {
        println!("{}", "No outputs found for this job.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} output(s):", outputs.len()).bold());
    println!();
    for output in outputs {
        let mut line = format!("{:?}", output.role).to_lowercase();
        if let Some(track) = output.track {
            line.push_str(&format!(" ({:?})", track).to_lowercase());
        }
        if let Some(bitrate) = output.bitrate {
            line.push_str(&format!(" {} bps", bitrate));
        }
        if let Some(language) = &output.language {
            line.push_str(&format!(" [{}]", language));
        }
        if output.is_template {
            line.push_str(" template");
        }
        println!("  {} {}", "▸".cyan(), line);
        println!("    Path:   {}", output.output_path.dimmed());
        println!("    Muxing: {}", output.muxing_id.dimmed());
    }

    Ok(())
}
