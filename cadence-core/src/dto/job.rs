//! Job DTOs for the remote job service

use serde::{Deserialize, Serialize};

use crate::domain::job::{JobId, JobStatus};
use crate::domain::report::{Message, ProgressReport};

/// Response to a job submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    pub id: JobId,
}

/// Status body returned by every job kind's status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<f32>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl From<StatusResponse> for ProgressReport {
    fn from(response: StatusResponse) -> Self {
        Self {
            status: response.status,
            progress: response.progress,
            messages: response.messages,
            observed_at: chrono::Utc::now(),
        }
    }
}

impl From<&ProgressReport> for StatusResponse {
    fn from(report: &ProgressReport) -> Self {
        Self {
            status: report.status,
            progress: report.progress,
            messages: report.messages.clone(),
        }
    }
}
