//! Live encoding API endpoints

use crate::JobServiceClient;
use crate::error::Result;
use cadence_core::domain::job::{JobDescription, JobId, JobKind};
use cadence_core::domain::live::LiveDetails;
use reqwest::Method;
use tracing::debug;

impl JobServiceClient {
    fn live_url(&self, id: &JobId, action: &str) -> String {
        format!(
            "{}/api/jobs/{}/{}/{}",
            self.base_url,
            JobKind::LiveEncoding.path_segment(),
            id,
            action
        )
    }

    /// Start a live encoding
    ///
    /// The call returns once the service accepted the request; the encoding
    /// reaches RUNNING later.
    ///
    /// # Arguments
    /// * `id` - The live encoding identifier
    /// * `description` - The start request (manifests, ingest settings)
    pub async fn start_live(&self, id: &JobId, description: &JobDescription) -> Result<()> {
        let url = self.live_url(id, "start");
        debug!("Starting live encoding {}", id);

        let response = self
            .request(Method::POST, &url)
            .json(description)
            .send()
            .await?;

        self.handle_empty_response(response).await
    }

    /// Request a graceful stop of a live encoding
    ///
    /// # Arguments
    /// * `id` - The live encoding identifier
    pub async fn stop_live(&self, id: &JobId) -> Result<()> {
        let url = self.live_url(id, "stop");
        debug!("Stopping live encoding {}", id);

        let response = self.request(Method::POST, &url).send().await?;

        self.handle_empty_response(response).await
    }

    /// Get the ingest details of a running live encoding
    ///
    /// The service answers 404 until the encoder is provisioned.
    ///
    /// # Arguments
    /// * `id` - The live encoding identifier
    pub async fn get_live_details(&self, id: &JobId) -> Result<LiveDetails> {
        let url = self.live_url(id, "details");
        let response = self.request(Method::GET, &url).send().await?;

        self.handle_response(response).await
    }
}
