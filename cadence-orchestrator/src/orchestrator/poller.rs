//! Fixed-interval status polling
//!
//! One loop serves every job kind. Each attempt waits the policy interval
//! and then issues exactly one status request, so `max_attempts` bounds the
//! number of requests and no wait follows the last permitted one.

use cadence_core::domain::job::JobStatus;
use cadence_core::domain::report::ProgressReport;
use tokio::time;
use tracing::{debug, error, info, warn};

use super::JobOrchestrator;
use crate::config::PollPolicy;
use crate::error::{OrchestratorError, Result};
use crate::handle::JobHandle;

/// What a polling loop waits for
#[derive(Debug, Clone, Copy)]
enum Target {
    Terminal,
    State(JobStatus),
}

impl Target {
    fn describe(self) -> String {
        match self {
            Self::Terminal => "a terminal state".to_string(),
            Self::State(status) => status.to_string(),
        }
    }
}

impl JobOrchestrator {
    /// Polls until the job is FINISHED or ERROR
    ///
    /// Returns the FINISHED report. ERROR becomes
    /// [`OrchestratorError::JobFailed`] carrying the reported error messages.
    /// Once a terminal report was observed through `handle`, further calls
    /// answer from it without contacting the service.
    pub async fn poll_until_terminal(
        &self,
        handle: &mut JobHandle,
        policy: &PollPolicy,
    ) -> Result<ProgressReport> {
        self.poll(handle, Target::Terminal, policy).await
    }

    /// Polls until the job reports `target`
    ///
    /// ERROR fails fast, and any other terminal status that is not the target
    /// ends the wait with [`OrchestratorError::UnexpectedTerminal`].
    pub async fn await_state(
        &self,
        handle: &mut JobHandle,
        target: JobStatus,
        policy: &PollPolicy,
    ) -> Result<ProgressReport> {
        self.poll(handle, Target::State(target), policy).await
    }

    async fn poll(
        &self,
        handle: &mut JobHandle,
        target: Target,
        policy: &PollPolicy,
    ) -> Result<ProgressReport> {
        if let Some(report) = handle.terminal_report() {
            debug!(
                "{} job {} already settled as {}",
                handle.kind(),
                handle.id(),
                report.status
            );
            return settle(handle, target, report.clone());
        }

        debug!(
            "Waiting for {} job {} to reach {} (interval: {:?}, attempts: {})",
            handle.kind(),
            handle.id(),
            target.describe(),
            policy.interval,
            policy.max_attempts
        );

        let mut attempts = 0;
        while attempts < policy.max_attempts {
            time::sleep(policy.interval).await;
            attempts += 1;

            let report = self
                .service
                .get_status(handle.kind(), handle.id())
                .await
                .map_err(|source| {
                    error!(
                        "Status request for {} job {} failed: {}",
                        handle.kind(),
                        handle.id(),
                        source
                    );
                    OrchestratorError::Service {
                        job_id: handle.id().clone(),
                        kind: handle.kind(),
                        source,
                    }
                })?;

            match report.progress {
                Some(progress) => info!(
                    "{} job {} is {} ({:.0}%)",
                    handle.kind(),
                    handle.id(),
                    report.status,
                    progress
                ),
                None => info!(
                    "{} job {} is {}",
                    handle.kind(),
                    handle.id(),
                    report.status
                ),
            }

            handle.observe(&report);

            if reached(target, report.status) || report.is_terminal() {
                return settle(handle, target, report);
            }
        }

        warn!(
            "{} job {} did not reach {} after {} poll(s)",
            handle.kind(),
            handle.id(),
            target.describe(),
            attempts
        );
        Err(OrchestratorError::Timeout {
            job_id: handle.id().clone(),
            kind: handle.kind(),
            awaited: target.describe(),
            attempts,
            last_status: handle.last_status(),
        })
    }
}

fn reached(target: Target, status: JobStatus) -> bool {
    match target {
        Target::Terminal => status.is_terminal(),
        Target::State(expected) => status == expected,
    }
}

/// Turns an observed report into the outcome of a wait
fn settle(handle: &JobHandle, target: Target, report: ProgressReport) -> Result<ProgressReport> {
    if report.status == JobStatus::Error {
        for message in report.error_messages() {
            error!("{} job {}: {}", handle.kind(), handle.id(), message);
        }
        return Err(OrchestratorError::job_failed(
            handle.id().clone(),
            handle.kind(),
            report,
        ));
    }

    if reached(target, report.status) {
        return Ok(report);
    }

    let expected = match target {
        Target::State(expected) => expected,
        Target::Terminal => JobStatus::Finished,
    };
    Err(OrchestratorError::UnexpectedTerminal {
        job_id: handle.id().clone(),
        kind: handle.kind(),
        expected,
        actual: report.status,
    })
}
