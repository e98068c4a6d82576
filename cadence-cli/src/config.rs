//! Configuration module
//!
//! Turns command-line settings into orchestrator configuration.

use std::time::Duration;

use anyhow::Result;
use cadence_client::JobServiceClient;
use cadence_orchestrator::{JobOrchestrator, OrchestratorConfig};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the encoding service
    pub service_url: String,
    pub api_key: Option<String>,
    pub tenant_org_id: Option<String>,
    /// Seconds between status requests
    pub poll_interval: u64,
    pub max_poll_attempts: u32,
    pub live_startup_attempts: u32,
    /// Seconds before a single HTTP request is abandoned
    pub request_timeout: u64,
}

impl Config {
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        let mut config = OrchestratorConfig::new(self.service_url.clone());
        config.api_key = self.api_key.clone();
        config.tenant_org_id = self.tenant_org_id.clone();
        config.poll_interval = Duration::from_secs(self.poll_interval);
        config.max_poll_attempts = self.max_poll_attempts;
        config.live_startup_attempts = self.live_startup_attempts;
        config.request_timeout = Duration::from_secs(self.request_timeout);
        config
    }

    pub fn orchestrator(&self) -> Result<JobOrchestrator> {
        JobOrchestrator::connect(&self.orchestrator_config())
    }

    /// Plain client for one-off requests
    pub fn client(&self) -> Result<JobServiceClient> {
        let config = self.orchestrator_config();
        config.validate()?;
        config.build_client()
    }
}
