//! Orchestrator configuration
//!
//! Defines all configurable parameters for driving remote jobs: where the
//! service lives, how to authenticate, and the fixed polling cadence.
//! Configuration is passed to the orchestrator at construction; nothing is
//! read from process-wide state afterwards.

use std::time::Duration;

use anyhow::Context;
use cadence_client::JobServiceClient;

/// Fixed-interval polling budget
///
/// Every wait in the orchestrator uses the same interval; there is no
/// backoff and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before each status request
    pub interval: Duration,
    /// Maximum number of status requests
    pub max_attempts: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 720)
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Remote service base URL (e.g., "https://api.example.com")
    pub service_url: String,

    /// API key sent with every request
    pub api_key: Option<String>,

    /// Tenant organization to act on behalf of
    pub tenant_org_id: Option<String>,

    /// How long to wait between status requests
    pub poll_interval: Duration,

    /// Status requests allowed before a finite job times out
    pub max_poll_attempts: u32,

    /// Status or detail requests allowed while a live encoding starts up
    pub live_startup_attempts: u32,

    /// Timeout applied to each HTTP request
    pub request_timeout: Duration,
}

impl OrchestratorConfig {
    /// Creates a new configuration with defaults
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            api_key: None,
            tenant_org_id: None,
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: 720, // 1 hour
            live_startup_attempts: 60, // 5 minutes
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - CADENCE_SERVICE_URL (required)
    /// - CADENCE_API_KEY (optional)
    /// - CADENCE_TENANT_ORG_ID (optional)
    /// - CADENCE_POLL_INTERVAL (optional, seconds, default: 5)
    /// - CADENCE_MAX_POLL_ATTEMPTS (optional, default: 720)
    /// - CADENCE_LIVE_STARTUP_ATTEMPTS (optional, default: 60)
    /// - CADENCE_REQUEST_TIMEOUT (optional, seconds, default: 30)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Creates configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_url = lookup("CADENCE_SERVICE_URL")
            .ok_or_else(|| anyhow::anyhow!("CADENCE_SERVICE_URL environment variable not set"))?;

        let mut config = Self::new(service_url);
        config.api_key = lookup("CADENCE_API_KEY").filter(|s| !s.is_empty());
        config.tenant_org_id = lookup("CADENCE_TENANT_ORG_ID").filter(|s| !s.is_empty());

        if let Some(raw) = lookup("CADENCE_POLL_INTERVAL") {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("invalid CADENCE_POLL_INTERVAL '{}'", raw))?;
            config.poll_interval = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("CADENCE_MAX_POLL_ATTEMPTS") {
            config.max_poll_attempts = raw
                .parse::<u32>()
                .with_context(|| format!("invalid CADENCE_MAX_POLL_ATTEMPTS '{}'", raw))?;
        }

        if let Some(raw) = lookup("CADENCE_LIVE_STARTUP_ATTEMPTS") {
            config.live_startup_attempts = raw
                .parse::<u32>()
                .with_context(|| format!("invalid CADENCE_LIVE_STARTUP_ATTEMPTS '{}'", raw))?;
        }

        if let Some(raw) = lookup("CADENCE_REQUEST_TIMEOUT") {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("invalid CADENCE_REQUEST_TIMEOUT '{}'", raw))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_tenant_org(mut self, tenant_org_id: impl Into<String>) -> Self {
        self.tenant_org_id = Some(tenant_org_id.into());
        self
    }

    /// Polling budget for finite jobs
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(self.poll_interval, self.max_poll_attempts)
    }

    /// Polling budget while a live encoding starts up
    pub fn live_startup_policy(&self) -> PollPolicy {
        PollPolicy::new(self.poll_interval, self.live_startup_attempts)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.service_url.is_empty() {
            anyhow::bail!("service_url cannot be empty");
        }

        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            anyhow::bail!("service_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.max_poll_attempts == 0 {
            anyhow::bail!("max_poll_attempts must be greater than 0");
        }

        if self.live_startup_attempts == 0 {
            anyhow::bail!("live_startup_attempts must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds an HTTP client for the configured service
    pub fn build_client(&self) -> anyhow::Result<JobServiceClient> {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let mut client = JobServiceClient::with_client(self.service_url.clone(), http);
        if let Some(key) = &self.api_key {
            client = client.with_api_key(key.clone());
        }
        if let Some(org) = &self.tenant_org_id {
            client = client.with_tenant_org(org.clone());
        }
        Ok(client)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
