//! Job orchestrator
//!
//! Drives remote jobs through their lifecycle: submission, fixed-interval
//! polling until a terminal state, chaining of dependent jobs and the
//! start/stop protocol of persistent jobs. All remote access goes through
//! [`JobService`], so every job kind shares the same loop.

mod poller;

use std::sync::Arc;

use cadence_client::JobService;
use cadence_core::domain::artifact::OutputLocation;
use cadence_core::domain::job::{JobDescription, JobId, JobKind, JobStatus};
use cadence_core::domain::live::LiveDetails;
use cadence_core::domain::report::ProgressReport;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::{OrchestratorConfig, PollPolicy};
use crate::error::{OrchestratorError, Result, SubmissionFailure};
use crate::handle::JobHandle;

/// ERROR-severity messages of a report, in reported order
///
/// Returns an empty list for reports that carry no errors, including
/// FINISHED ones.
pub fn extract_errors(report: &ProgressReport) -> Vec<String> {
    report.error_messages()
}

/// Drives jobs on a remote service
#[derive(Clone)]
pub struct JobOrchestrator {
    service: Arc<dyn JobService>,
    policy: PollPolicy,
    live_policy: PollPolicy,
}

impl JobOrchestrator {
    /// Creates an orchestrator over any service implementation
    pub fn new(config: &OrchestratorConfig, service: Arc<dyn JobService>) -> Self {
        Self {
            service,
            policy: config.poll_policy(),
            live_policy: config.live_startup_policy(),
        }
    }

    /// Creates an orchestrator talking HTTP to the configured service
    pub fn connect(config: &OrchestratorConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let client = config.build_client()?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Polling budget for finite jobs
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Polling budget while a persistent job starts up
    pub fn live_policy(&self) -> PollPolicy {
        self.live_policy
    }

    /// Submits a job and returns a handle on it
    ///
    /// Nothing is retried; a rejection surfaces as a submission error.
    pub async fn submit(&self, kind: JobKind, description: &JobDescription) -> Result<JobHandle> {
        let id = self
            .service
            .submit(kind, description)
            .await
            .map_err(|e| {
                warn!("{} submission rejected: {}", kind, e);
                OrchestratorError::rejected(kind, e)
            })?;

        info!("Submitted {} job {}", kind, id);
        Ok(JobHandle::attach(kind, id))
    }

    /// Submits a job and polls it to a terminal state with the default budget
    pub async fn run(&self, kind: JobKind, description: &JobDescription) -> Result<JobHandle> {
        let mut handle = self.submit(kind, description).await?;
        let policy = self.policy;
        self.poll_until_terminal(&mut handle, &policy).await?;
        Ok(handle)
    }

    /// Submits a job built from a finished predecessor's outputs
    ///
    /// The predecessor must have been observed FINISHED through polling.
    /// Its outputs are fetched once and handed to `build` together with its
    /// identifier.
    pub async fn chain<F>(
        &self,
        predecessor: &JobHandle,
        kind: JobKind,
        build: F,
    ) -> Result<JobHandle>
    where
        F: FnOnce(&JobId, &[OutputLocation]) -> anyhow::Result<JobDescription>,
    {
        if !predecessor.is_finished() {
            return Err(OrchestratorError::Submission {
                kind,
                reason: SubmissionFailure::PredecessorNotFinished {
                    job_id: predecessor.id().clone(),
                    status: predecessor.last_status(),
                },
            });
        }

        let outputs = self
            .service
            .get_outputs(predecessor.kind(), predecessor.id())
            .await
            .map_err(|source| OrchestratorError::Service {
                job_id: predecessor.id().clone(),
                kind: predecessor.kind(),
                source,
            })?;

        debug!(
            "{} job {} produced {} output(s)",
            predecessor.kind(),
            predecessor.id(),
            outputs.len()
        );

        let description =
            build(predecessor.id(), &outputs).map_err(|e| OrchestratorError::Submission {
                kind,
                reason: SubmissionFailure::InvalidDescription(format!("{:#}", e)),
            })?;

        self.submit(kind, &description).await
    }

    /// Starts a persistent job and waits until it reports RUNNING
    pub async fn start_persistent(
        &self,
        id: JobId,
        description: &JobDescription,
        policy: &PollPolicy,
    ) -> Result<JobHandle> {
        let kind = JobKind::LiveEncoding;
        self.service
            .start_persistent(&id, description)
            .await
            .map_err(|e| {
                warn!("Failed to start {} job {}: {}", kind, id, e);
                OrchestratorError::rejected(kind, e)
            })?;

        info!("Started {} job {}, waiting for it to run", kind, id);
        let mut handle = JobHandle::attach(kind, id);
        self.await_state(&mut handle, JobStatus::Running, policy)
            .await?;
        Ok(handle)
    }

    /// Requests graceful termination and waits for FINISHED
    ///
    /// A job already observed in a terminal state is not contacted: FINISHED
    /// is a no-op and ERROR returns the recorded failure.
    pub async fn stop(&self, handle: &mut JobHandle, policy: &PollPolicy) -> Result<()> {
        if !handle.kind().is_persistent() {
            return Err(OrchestratorError::NotPersistent {
                job_id: handle.id().clone(),
                kind: handle.kind(),
            });
        }

        if handle.is_terminal() {
            debug!(
                "{} job {} already settled, not sending stop",
                handle.kind(),
                handle.id()
            );
            return self
                .await_state(handle, JobStatus::Finished, policy)
                .await
                .map(|_| ());
        }

        info!("Stopping {} job {}", handle.kind(), handle.id());
        self.service
            .stop_persistent(handle.id())
            .await
            .map_err(|source| OrchestratorError::Service {
                job_id: handle.id().clone(),
                kind: handle.kind(),
                source,
            })?;

        self.await_state(handle, JobStatus::Finished, policy)
            .await?;
        info!("{} job {} stopped", handle.kind(), handle.id());
        Ok(())
    }

    /// Reads the connection details of a running persistent job
    ///
    /// Transient failures are retried at the policy interval up to
    /// `max_attempts` requests in total. Any other failure surfaces at once.
    pub async fn fetch_persistent_details(
        &self,
        handle: &JobHandle,
        policy: &PollPolicy,
    ) -> Result<LiveDetails> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.service.get_persistent_details(handle.id()).await {
                Ok(details) => {
                    debug!(
                        "Got details of {} after {} attempt(s)",
                        handle.id(),
                        attempts
                    );
                    return Ok(details);
                }
                Err(e) if e.is_transient() => {
                    if attempts >= policy.max_attempts {
                        warn!(
                            "Details of {} still unavailable after {} attempt(s)",
                            handle.id(),
                            attempts
                        );
                        return Err(OrchestratorError::TransientFetch {
                            job_id: handle.id().clone(),
                            attempts,
                            source: e,
                        });
                    }
                    debug!(
                        "Details of {} not ready ({}), retrying in {:?}",
                        handle.id(),
                        e,
                        policy.interval
                    );
                    time::sleep(policy.interval).await;
                }
                Err(source) => {
                    return Err(OrchestratorError::Service {
                        job_id: handle.id().clone(),
                        kind: handle.kind(),
                        source,
                    });
                }
            }
        }
    }
}
