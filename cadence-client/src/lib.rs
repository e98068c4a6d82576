//! Cadence HTTP Client
//!
//! A simple, type-safe HTTP client for the remote encoding service's job API.
//!
//! The [`JobService`] trait is the capability the orchestrator drives jobs
//! through; [`JobServiceClient`] implements it over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use cadence_client::JobServiceClient;
//! use cadence_core::domain::job::{JobDescription, JobKind};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = JobServiceClient::new("https://api.example.com")
//!         .with_api_key("secret");
//!
//!     let id = client
//!         .submit(JobKind::Encoding, &JobDescription::new(serde_json::json!({})))
//!         .await?;
//!
//!     println!("Submitted encoding: {}", id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod live;
mod service;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use service::JobService;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Header selecting the tenant organization
pub const TENANT_ORG_HEADER: &str = "X-Tenant-Org-Id";

/// HTTP client for the remote job service
///
/// Methods are organized into logical groups:
/// - Job lifecycle (submit, status, outputs)
/// - Live encodings (start, stop, ingest details)
#[derive(Debug, Clone)]
pub struct JobServiceClient {
    /// Base URL of the service (e.g., "https://api.example.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
    api_key: Option<String>,
    tenant_org_id: Option<String>,
}

impl JobServiceClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service
    ///
    /// # Example
    /// ```
    /// use cadence_client::JobServiceClient;
    ///
    /// let client = JobServiceClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use cadence_client::JobServiceClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = JobServiceClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_key: None,
            tenant_org_id: None,
        }
    }

    /// Authenticate every request with an API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Act on behalf of a tenant organization
    pub fn with_tenant_org(mut self, tenant_org_id: impl Into<String>) -> Self {
        self.tenant_org_id = Some(tenant_org_id.into());
        self
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request with the authentication headers applied
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        if let Some(org) = &self.tenant_org_id {
            builder = builder.header(TENANT_ORG_HEADER, org);
        }
        builder
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
