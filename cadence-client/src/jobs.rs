//! Job-related API endpoints

use crate::JobServiceClient;
use crate::error::Result;
use cadence_core::domain::artifact::OutputLocation;
use cadence_core::domain::job::{JobDescription, JobId, JobKind};
use cadence_core::domain::report::ProgressReport;
use cadence_core::dto::job::{StatusResponse, SubmitJobResponse};
use reqwest::Method;
use tracing::debug;

impl JobServiceClient {
    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Submit a job of the given kind
    ///
    /// # Arguments
    /// * `kind` - Which collection the job belongs to
    /// * `description` - The job description, forwarded as-is
    ///
    /// # Returns
    /// The identifier the service assigned to the job
    ///
    /// # Example
    /// ```no_run
    /// # use cadence_client::JobServiceClient;
    /// # use cadence_core::domain::job::{JobDescription, JobKind};
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = JobServiceClient::new("http://localhost:8080");
    /// let id = client
    ///     .submit(JobKind::Encoding, &JobDescription::new(serde_json::json!({"input": "in.mov"})))
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit(&self, kind: JobKind, description: &JobDescription) -> Result<JobId> {
        let url = format!("{}/api/jobs/{}", self.base_url, kind.path_segment());
        debug!("Submitting {} job to {}", kind, url);

        let response = self
            .request(Method::POST, &url)
            .json(description)
            .send()
            .await?;

        let submitted: SubmitJobResponse = self.handle_response(response).await?;
        Ok(submitted.id)
    }

    /// Get the current status of a job
    ///
    /// # Arguments
    /// * `kind` - The job's kind
    /// * `id` - The job identifier
    ///
    /// # Returns
    /// A progress report stamped with the time it was received
    pub async fn get_status(&self, kind: JobKind, id: &JobId) -> Result<ProgressReport> {
        let url = format!(
            "{}/api/jobs/{}/{}/status",
            self.base_url,
            kind.path_segment(),
            id
        );
        let response = self.request(Method::GET, &url).send().await?;

        let status: StatusResponse = self.handle_response(response).await?;
        Ok(status.into())
    }

    // =============================================================================
    // Job Artifacts
    // =============================================================================

    /// List the outputs written by a job
    ///
    /// # Arguments
    /// * `kind` - The job's kind
    /// * `id` - The job identifier
    pub async fn get_outputs(&self, kind: JobKind, id: &JobId) -> Result<Vec<OutputLocation>> {
        let url = format!(
            "{}/api/jobs/{}/{}/outputs",
            self.base_url,
            kind.path_segment(),
            id
        );
        let response = self.request(Method::GET, &url).send().await?;

        self.handle_response(response).await
    }
}
