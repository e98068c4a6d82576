//! Cadence CLI
//!
//! Command-line interface for driving jobs on a remote encoding service.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence encoding job orchestrator", long_about = None)]
struct Cli {
    /// Encoding service URL
    #[arg(long, env = "CADENCE_SERVICE_URL", default_value = "http://localhost:8080")]
    service_url: String,

    /// API key sent with every request
    #[arg(long, env = "CADENCE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Tenant organization to act on behalf of
    #[arg(long, env = "CADENCE_TENANT_ORG_ID")]
    tenant_org_id: Option<String>,

    /// Seconds between status requests
    #[arg(long, env = "CADENCE_POLL_INTERVAL", default_value = "5")]
    poll_interval: u64,

    /// Status requests before a job is considered stuck
    #[arg(long, env = "CADENCE_MAX_POLL_ATTEMPTS", default_value = "720")]
    max_poll_attempts: u32,

    /// Status and detail requests allowed while a live encoding starts up
    #[arg(long, env = "CADENCE_LIVE_STARTUP_ATTEMPTS", default_value = "60")]
    live_startup_attempts: u32,

    /// Seconds before a single HTTP request is abandoned
    #[arg(long, env = "CADENCE_REQUEST_TIMEOUT", default_value = "30")]
    request_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_orchestrator=info,cadence_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        service_url: cli.service_url,
        api_key: cli.api_key,
        tenant_org_id: cli.tenant_org_id,
        poll_interval: cli.poll_interval,
        max_poll_attempts: cli.max_poll_attempts,
        live_startup_attempts: cli.live_startup_attempts,
        request_timeout: cli.request_timeout,
    };

    info!(
        "Using encoding service at {} (poll interval: {}s, max attempts: {})",
        config.service_url, config.poll_interval, config.max_poll_attempts
    );

    handle_command(cli.command, &config).await
}
