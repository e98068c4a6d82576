//! Mock job service for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use cadence_client::{ClientError, JobService};
use cadence_core::domain::artifact::OutputLocation;
use cadence_core::domain::job::{JobDescription, JobId, JobKind};
use cadence_core::domain::live::LiveDetails;
use cadence_core::domain::report::ProgressReport;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A recorded submission for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub kind: JobKind,
    pub id: JobId,
    pub description: JobDescription,
    pub timestamp: DateTime<Utc>,
}

/// Scripted failure of the details endpoint.
#[derive(Debug, Clone, Copy)]
struct DetailsFailure {
    remaining: u32,
    status: u16,
}

/// Mock implementation of the JobService trait.
///
/// Provides controllable behavior for testing:
/// - Script the status sequence of each job; the last entry repeats
/// - Count status requests per job
/// - Record submissions, starts and stops
/// - Simulate rejections and temporarily unavailable details
#[derive(Debug, Clone, Default)]
pub struct MockJobService {
    statuses: Arc<RwLock<HashMap<(JobKind, JobId), VecDeque<ProgressReport>>>>,
    status_requests: Arc<RwLock<HashMap<(JobKind, JobId), u32>>>,
    after_stop: Arc<RwLock<HashMap<JobId, Vec<ProgressReport>>>>,
    submissions: Arc<RwLock<Vec<RecordedSubmission>>>,
    next_ids: Arc<RwLock<VecDeque<JobId>>>,
    next_rejection: Arc<RwLock<Option<(u16, String)>>>,
    outputs: Arc<RwLock<HashMap<JobId, Vec<OutputLocation>>>>,
    output_requests: Arc<RwLock<u32>>,
    started: Arc<RwLock<Vec<JobId>>>,
    stopped: Arc<RwLock<Vec<JobId>>>,
    details: Arc<RwLock<HashMap<JobId, LiveDetails>>>,
    details_failures: Arc<RwLock<HashMap<JobId, DetailsFailure>>>,
    details_requests: Arc<RwLock<u32>>,
}

impl MockJobService {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the identifier assigned to the next submission.
    ///
    /// Without a queued identifier, submissions get a random one.
    pub async fn push_submission_id(&self, id: impl Into<JobId>) {
        self.next_ids.write().await.push_back(id.into());
    }

    /// Reject the next submission with the given HTTP status.
    pub async fn reject_next_submission(&self, status: u16, message: impl Into<String>) {
        *self.next_rejection.write().await = Some((status, message.into()));
    }

    /// Script the reports returned by successive status requests.
    pub async fn script_status(
        &self,
        kind: JobKind,
        id: impl Into<JobId>,
        reports: Vec<ProgressReport>,
    ) {
        self.statuses
            .write()
            .await
            .insert((kind, id.into()), reports.into());
    }

    /// Script the reports a persistent job returns once stop was requested.
    pub async fn script_after_stop(&self, id: impl Into<JobId>, reports: Vec<ProgressReport>) {
        self.after_stop.write().await.insert(id.into(), reports);
    }

    pub async fn set_outputs(&self, id: impl Into<JobId>, outputs: Vec<OutputLocation>) {
        self.outputs.write().await.insert(id.into(), outputs);
    }

    pub async fn set_details(&self, id: impl Into<JobId>, details: LiveDetails) {
        self.details.write().await.insert(id.into(), details);
    }

    /// Fail the next `count` details requests for `id` with `status`.
    pub async fn fail_details(&self, id: impl Into<JobId>, count: u32, status: u16) {
        self.details_failures.write().await.insert(
            id.into(),
            DetailsFailure {
                remaining: count,
                status,
            },
        );
    }

    /// Number of status requests made for a job.
    pub async fn status_requests(&self, kind: JobKind, id: impl Into<JobId>) -> u32 {
        self.status_requests
            .read()
            .await
            .get(&(kind, id.into()))
            .copied()
            .unwrap_or(0)
    }

    pub async fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.read().await.clone()
    }

    pub async fn output_requests(&self) -> u32 {
        *self.output_requests.read().await
    }

    pub async fn started(&self) -> Vec<JobId> {
        self.started.read().await.clone()
    }

    pub async fn stopped(&self) -> Vec<JobId> {
        self.stopped.read().await.clone()
    }

    pub async fn details_requests(&self) -> u32 {
        *self.details_requests.read().await
    }

    fn not_found(what: &str, id: &JobId) -> ClientError {
        ClientError::api_error(404, format!("{} {} not found", what, id))
    }
}

#[async_trait]
impl JobService for MockJobService {
    async fn submit(
        &self,
        kind: JobKind,
        description: &JobDescription,
    ) -> cadence_client::Result<JobId> {
        if let Some((status, message)) = self.next_rejection.write().await.take() {
            return Err(ClientError::api_error(status, message));
        }

        let id = self
            .next_ids
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| JobId::new(Uuid::new_v4().to_string()));

        self.submissions.write().await.push(RecordedSubmission {
            kind,
            id: id.clone(),
            description: description.clone(),
            timestamp: Utc::now(),
        });
        Ok(id)
    }

    async fn get_status(&self, kind: JobKind, id: &JobId) -> cadence_client::Result<ProgressReport> {
        let key = (kind, id.clone());
        *self
            .status_requests
            .write()
            .await
            .entry(key.clone())
            .or_insert(0) += 1;

        let mut statuses = self.statuses.write().await;
        let script = statuses
            .get_mut(&key)
            .ok_or_else(|| Self::not_found("job", id))?;

        let report = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        report.ok_or_else(|| Self::not_found("status of", id))
    }

    async fn get_outputs(
        &self,
        _kind: JobKind,
        id: &JobId,
    ) -> cadence_client::Result<Vec<OutputLocation>> {
        *self.output_requests.write().await += 1;
        Ok(self
            .outputs
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    async fn start_persistent(
        &self,
        id: &JobId,
        _description: &JobDescription,
    ) -> cadence_client::Result<()> {
        if let Some((status, message)) = self.next_rejection.write().await.take() {
            return Err(ClientError::api_error(status, message));
        }
        self.started.write().await.push(id.clone());
        Ok(())
    }

    async fn stop_persistent(&self, id: &JobId) -> cadence_client::Result<()> {
        self.stopped.write().await.push(id.clone());
        if let Some(reports) = self.after_stop.write().await.remove(id) {
            self.statuses
                .write()
                .await
                .insert((JobKind::LiveEncoding, id.clone()), reports.into());
        }
        Ok(())
    }

    async fn get_persistent_details(&self, id: &JobId) -> cadence_client::Result<LiveDetails> {
        *self.details_requests.write().await += 1;

        if let Some(failure) = self.details_failures.write().await.get_mut(id) {
            if failure.remaining > 0 {
                failure.remaining -= 1;
                return Err(ClientError::api_error(
                    failure.status,
                    "encoder not provisioned yet",
                ));
            }
        }

        self.details
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found("live encoding", id))
    }
}
