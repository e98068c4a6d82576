//! Job service capability
//!
//! The orchestrator talks to the remote service only through this trait, so
//! every job kind shares one polling routine and tests can substitute a
//! scripted implementation.

use async_trait::async_trait;
use cadence_core::domain::artifact::OutputLocation;
use cadence_core::domain::job::{JobDescription, JobId, JobKind};
use cadence_core::domain::live::LiveDetails;
use cadence_core::domain::report::ProgressReport;

use crate::JobServiceClient;
use crate::error::Result;

/// Operations the remote job service offers
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submits a job and returns its identifier
    async fn submit(&self, kind: JobKind, description: &JobDescription) -> Result<JobId>;

    /// Fetches one status snapshot of a job
    async fn get_status(&self, kind: JobKind, id: &JobId) -> Result<ProgressReport>;

    /// Lists the artifacts a job produced
    async fn get_outputs(&self, kind: JobKind, id: &JobId) -> Result<Vec<OutputLocation>>;

    /// Starts a persistent job
    async fn start_persistent(&self, id: &JobId, description: &JobDescription) -> Result<()>;

    /// Requests graceful termination of a persistent job
    async fn stop_persistent(&self, id: &JobId) -> Result<()>;

    /// Reads the connection details of a running persistent job
    async fn get_persistent_details(&self, id: &JobId) -> Result<LiveDetails>;
}

#[async_trait]
impl JobService for JobServiceClient {
    async fn submit(&self, kind: JobKind, description: &JobDescription) -> Result<JobId> {
        JobServiceClient::submit(self, kind, description).await
    }

    async fn get_status(&self, kind: JobKind, id: &JobId) -> Result<ProgressReport> {
        JobServiceClient::get_status(self, kind, id).await
    }

    async fn get_outputs(&self, kind: JobKind, id: &JobId) -> Result<Vec<OutputLocation>> {
        JobServiceClient::get_outputs(self, kind, id).await
    }

    async fn start_persistent(&self, id: &JobId, description: &JobDescription) -> Result<()> {
        self.start_live(id, description).await
    }

    async fn stop_persistent(&self, id: &JobId) -> Result<()> {
        self.stop_live(id).await
    }

    async fn get_persistent_details(&self, id: &JobId) -> Result<LiveDetails> {
        self.get_live_details(id).await
    }
}
