//! Error types for job orchestration

use cadence_client::ClientError;
use cadence_core::domain::job::{JobId, JobKind, JobStatus};
use cadence_core::domain::report::ProgressReport;
use thiserror::Error;

/// Result type alias for orchestration
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Why a job could not be submitted
#[derive(Debug, Error)]
pub enum SubmissionFailure {
    /// The service rejected the request
    #[error("{0}")]
    Rejected(#[source] ClientError),

    /// A dependent job was requested before its predecessor finished
    #[error("predecessor {job_id} has not finished (last status: {})", display_status(.status))]
    PredecessorNotFinished {
        job_id: JobId,
        status: Option<JobStatus>,
    },

    /// The dependent job could not be built from the predecessor's outputs
    #[error("invalid job description: {0}")]
    InvalidDescription(String),
}

/// Errors that can occur while driving a job
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The job was never accepted by the service
    #[error("{kind} submission failed: {reason}")]
    Submission {
        kind: JobKind,
        #[source]
        reason: SubmissionFailure,
    },

    /// The job reached ERROR
    #[error("{kind} job {job_id} failed: {}", display_errors(.errors))]
    JobFailed {
        job_id: JobId,
        kind: JobKind,
        /// ERROR-severity messages, in the order the service reported them
        errors: Vec<String>,
        /// The terminal report the failure was read from
        report: Box<ProgressReport>,
    },

    /// The awaited state was not observed within the attempt budget
    #[error(
        "{kind} job {job_id} did not reach {awaited} after {attempts} poll(s) (last status: {})",
        display_status(.last_status)
    )]
    Timeout {
        job_id: JobId,
        kind: JobKind,
        awaited: String,
        attempts: u32,
        last_status: Option<JobStatus>,
    },

    /// The job settled in a terminal state other than the awaited one
    #[error("{kind} job {job_id} ended in {actual} while waiting for {expected}")]
    UnexpectedTerminal {
        job_id: JobId,
        kind: JobKind,
        expected: JobStatus,
        actual: JobStatus,
    },

    /// Stop was requested for a job that runs to completion on its own
    #[error("{kind} job {job_id} is not persistent and cannot be stopped")]
    NotPersistent { job_id: JobId, kind: JobKind },

    /// Persistent job details stayed unavailable for the whole retry budget
    #[error("details of {job_id} unavailable after {attempts} attempt(s): {source}")]
    TransientFetch {
        job_id: JobId,
        attempts: u32,
        #[source]
        source: ClientError,
    },

    /// A request about an accepted job failed
    #[error("request for {kind} job {job_id} failed: {source}")]
    Service {
        job_id: JobId,
        kind: JobKind,
        #[source]
        source: ClientError,
    },
}

impl OrchestratorError {
    pub(crate) fn rejected(kind: JobKind, source: ClientError) -> Self {
        Self::Submission {
            kind,
            reason: SubmissionFailure::Rejected(source),
        }
    }

    pub(crate) fn job_failed(job_id: JobId, kind: JobKind, report: ProgressReport) -> Self {
        Self::JobFailed {
            job_id,
            kind,
            errors: report.error_messages(),
            report: Box::new(report),
        }
    }

    /// Submission errors, including unmet chain preconditions
    pub fn is_submission_error(&self) -> bool {
        matches!(self, Self::Submission { .. })
    }

    /// Identifier of the job the error is about, when one was assigned
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Self::Submission { .. } => None,
            Self::JobFailed { job_id, .. }
            | Self::Timeout { job_id, .. }
            | Self::UnexpectedTerminal { job_id, .. }
            | Self::NotPersistent { job_id, .. }
            | Self::TransientFetch { job_id, .. }
            | Self::Service { job_id, .. } => Some(job_id),
        }
    }

    /// ERROR-severity messages carried by a failed job, empty otherwise
    pub fn error_messages(&self) -> &[String] {
        match self {
            Self::JobFailed { errors, .. } => errors,
            _ => &[],
        }
    }
}

fn display_status(status: &Option<JobStatus>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string())
}

fn display_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        "no error messages reported".to_string()
    } else {
        errors.join("; ")
    }
}
