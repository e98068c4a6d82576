//! Local handle on a remote job

use cadence_core::domain::job::{JobId, JobKind, JobStatus};
use cadence_core::domain::report::ProgressReport;
use chrono::{DateTime, Utc};

/// What the caller knows about one remote job
///
/// The remote service owns the job; the handle only remembers the
/// identifier and what polling observed. Once a terminal report has been
/// recorded it never changes, which makes polling a terminal job
/// idempotent without another request.
#[derive(Debug, Clone)]
pub struct JobHandle {
    id: JobId,
    kind: JobKind,
    attached_at: DateTime<Utc>,
    last_status: Option<JobStatus>,
    terminal: Option<ProgressReport>,
}

impl JobHandle {
    /// Attach to a job the service already knows about
    pub fn attach(kind: JobKind, id: JobId) -> Self {
        Self {
            id,
            kind,
            attached_at: Utc::now(),
            last_status: None,
            terminal: None,
        }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// When this handle was created (submission time for submitted jobs)
    pub fn attached_at(&self) -> DateTime<Utc> {
        self.attached_at
    }

    pub fn last_status(&self) -> Option<JobStatus> {
        self.last_status
    }

    /// The terminal report, once one has been observed
    pub fn terminal_report(&self) -> Option<&ProgressReport> {
        self.terminal.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn is_finished(&self) -> bool {
        matches!(&self.terminal, Some(report) if report.status == JobStatus::Finished)
    }

    /// Record one observation
    ///
    /// Observations after a terminal report are ignored.
    pub(crate) fn observe(&mut self, report: &ProgressReport) {
        if self.terminal.is_some() {
            return;
        }
        self.last_status = Some(report.status);
        if report.is_terminal() {
            self.terminal = Some(report.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handle_has_no_observations() {
        let handle = JobHandle::attach(JobKind::Encoding, JobId::new("enc-1"));
        assert!(handle.last_status().is_none());
        assert!(!handle.is_terminal());
        assert!(!handle.is_finished());
    }

    #[test]
    fn test_terminal_report_is_recorded_once() {
        let mut handle = JobHandle::attach(JobKind::Encoding, JobId::new("enc-1"));

        handle.observe(&ProgressReport::new(JobStatus::Running));
        assert_eq!(handle.last_status(), Some(JobStatus::Running));
        assert!(!handle.is_terminal());

        let finished = ProgressReport::new(JobStatus::Finished).with_progress(100.0);
        handle.observe(&finished);
        handle.observe(&ProgressReport::new(JobStatus::Error));

        assert!(handle.is_finished());
        assert_eq!(handle.last_status(), Some(JobStatus::Finished));
        assert_eq!(handle.terminal_report(), Some(&finished));
    }
}
