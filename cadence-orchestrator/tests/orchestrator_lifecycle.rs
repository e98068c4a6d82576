//! Orchestrator lifecycle integration tests.
//!
//! These tests drive jobs through a scripted service:
//! submit -> poll -> FINISHED | ERROR, chaining, and persistent start/stop.

use std::sync::Arc;
use std::time::Duration;

use cadence_core::domain::artifact::TrackRole;
use cadence_core::domain::job::{JobDescription, JobId, JobKind, JobStatus};
use cadence_core::domain::report::{Message, ProgressReport};
use cadence_orchestrator::{
    JobHandle, JobOrchestrator, OrchestratorConfig, OrchestratorError, PollPolicy,
    SubmissionFailure, extract_errors,
    testing::{MockJobService, fixtures},
};
use serde_json::json;

/// Test helper wiring an orchestrator to a mock service.
struct TestHarness {
    service: Arc<MockJobService>,
    orchestrator: JobOrchestrator,
}

impl TestHarness {
    fn new() -> Self {
        let config = OrchestratorConfig {
            poll_interval: Duration::from_millis(1),
            max_poll_attempts: 20,
            live_startup_attempts: 5,
            ..Default::default()
        };
        let service = Arc::new(MockJobService::new());
        let orchestrator = JobOrchestrator::new(&config, service.clone());
        Self {
            service,
            orchestrator,
        }
    }

    fn policy(&self, max_attempts: u32) -> PollPolicy {
        PollPolicy::new(Duration::from_millis(1), max_attempts)
    }

    async fn submit_encoding(&self, id: &str, script: Vec<ProgressReport>) -> JobHandle {
        self.service.push_submission_id(id).await;
        self.service
            .script_status(JobKind::Encoding, id, script)
            .await;
        self.orchestrator
            .submit(JobKind::Encoding, &encoding_description())
            .await
            .expect("submission should be accepted")
    }

    async fn attach_live(&self, id: &str, script: Vec<ProgressReport>) -> JobHandle {
        self.service
            .script_status(JobKind::LiveEncoding, id, script)
            .await;
        self.service.set_details(id, fixtures::live_details()).await;
        self.orchestrator
            .start_persistent(JobId::new(id), &live_description(), &self.policy(5))
            .await
            .expect("live encoding should start")
    }
}

fn encoding_description() -> JobDescription {
    JobDescription::new(json!({ "input": "s3://in/movie.mkv", "codec": "h264" })).named("movie")
}

fn live_description() -> JobDescription {
    JobDescription::new(json!({ "ingest": "rtmp" }))
}

// =============================================================================
// Polling
// =============================================================================

#[tokio::test]
async fn test_poll_reaches_finished_after_fourth_request() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding(
            "enc-1",
            vec![
                fixtures::queued(),
                fixtures::running(30.0),
                fixtures::running(80.0),
                fixtures::finished(),
            ],
        )
        .await;

    let report = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &harness.policy(10))
        .await
        .unwrap();

    assert_eq!(report.status, JobStatus::Finished);
    assert!(extract_errors(&report).is_empty());
    assert!(handle.is_finished());
    assert_eq!(
        harness.service.status_requests(JobKind::Encoding, "enc-1").await,
        4
    );
}

#[tokio::test]
async fn test_poll_fails_with_reported_errors() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding(
            "enc-2",
            vec![
                fixtures::running(10.0),
                fixtures::failed(&["codec config invalid"]),
            ],
        )
        .await;

    let err = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &harness.policy(10))
        .await
        .unwrap_err();

    match &err {
        OrchestratorError::JobFailed { job_id, errors, .. } => {
            assert_eq!(job_id, &JobId::new("enc-2"));
            assert_eq!(errors, &vec!["codec config invalid".to_string()]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(handle.last_status(), Some(JobStatus::Error));
    assert_eq!(
        harness.service.status_requests(JobKind::Encoding, "enc-2").await,
        2
    );
}

#[tokio::test]
async fn test_poll_times_out_after_exact_attempt_budget() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding("enc-3", vec![fixtures::running(50.0)])
        .await;

    let err = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &harness.policy(3))
        .await
        .unwrap_err();

    match &err {
        OrchestratorError::Timeout {
            attempts,
            last_status,
            ..
        } => {
            assert_eq!(*attempts, 3);
            assert_eq!(*last_status, Some(JobStatus::Running));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!handle.is_terminal());
    assert_eq!(
        harness.service.status_requests(JobKind::Encoding, "enc-3").await,
        3
    );
}

#[tokio::test]
async fn test_repeat_poll_of_finished_job_makes_no_request() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding("enc-4", vec![fixtures::running(90.0), fixtures::finished()])
        .await;
    let policy = harness.policy(10);

    let first = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &policy)
        .await
        .unwrap();
    let second = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &policy)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(
        harness.service.status_requests(JobKind::Encoding, "enc-4").await,
        2
    );
}

#[tokio::test]
async fn test_repeat_poll_of_failed_job_returns_same_failure() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding("enc-5", vec![fixtures::failed(&["a", "b"])])
        .await;
    let policy = harness.policy(10);

    let first = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &policy)
        .await
        .unwrap_err();
    let second = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &policy)
        .await
        .unwrap_err();

    assert_eq!(first.error_messages(), &["a".to_string(), "b".to_string()]);
    assert_eq!(first.error_messages(), second.error_messages());
    assert_eq!(
        harness.service.status_requests(JobKind::Encoding, "enc-5").await,
        1
    );
}

#[tokio::test]
async fn test_status_request_failure_is_not_retried() {
    let harness = TestHarness::new();
    let mut handle = JobHandle::attach(JobKind::Encoding, JobId::new("enc-missing"));

    let err = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &harness.policy(5))
        .await
        .unwrap_err();

    match &err {
        OrchestratorError::Service { source, .. } => assert!(source.is_not_found()),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        harness
            .service
            .status_requests(JobKind::Encoding, "enc-missing")
            .await,
        1
    );
}

#[tokio::test(start_paused = true)]
async fn test_poll_waits_before_each_request_and_not_after_last() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding("enc-11", vec![fixtures::running(10.0)])
        .await;
    let policy = PollPolicy::new(Duration::from_secs(5), 3);

    let started = tokio::time::Instant::now();
    let err = harness
        .orchestrator
        .poll_until_terminal(&mut handle, &policy)
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, OrchestratorError::Timeout { attempts: 3, .. }));
    // Three waits for three requests; a trailing wait would reach 20s
    assert!(elapsed >= Duration::from_secs(15), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(20), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_fresh_job_is_not_polled_immediately() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding("enc-12", vec![fixtures::finished()])
        .await;
    let policy = PollPolicy::new(Duration::from_secs(5), 3);

    let started = tokio::time::Instant::now();
    harness
        .orchestrator
        .poll_until_terminal(&mut handle, &policy)
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(5), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(10), "elapsed {:?}", elapsed);
}

#[test]
fn test_extract_errors_keeps_only_error_messages() {
    let report = ProgressReport::new(JobStatus::Error)
        .with_message(Message::info("downloading"))
        .with_message(Message::error("first"))
        .with_message(Message::warning("slow input"))
        .with_message(Message::error("second"));

    assert_eq!(extract_errors(&report), vec!["first", "second"]);
    assert!(extract_errors(&fixtures::finished()).is_empty());
}

// =============================================================================
// Submission and chaining
// =============================================================================

#[tokio::test]
async fn test_rejected_submission_is_submission_error() {
    let harness = TestHarness::new();
    harness
        .service
        .reject_next_submission(422, "codec config invalid")
        .await;

    let err = harness
        .orchestrator
        .submit(JobKind::Encoding, &encoding_description())
        .await
        .unwrap_err();

    assert!(err.is_submission_error());
    assert!(matches!(
        err,
        OrchestratorError::Submission {
            kind: JobKind::Encoding,
            reason: SubmissionFailure::Rejected(_),
        }
    ));
    assert!(harness.service.submissions().await.is_empty());
}

#[tokio::test]
async fn test_chain_before_predecessor_finished_fails() {
    let harness = TestHarness::new();
    let handle = harness
        .submit_encoding("enc-6", vec![fixtures::running(20.0)])
        .await;

    let err = harness
        .orchestrator
        .chain(&handle, JobKind::HlsManifest, |_, _| {
            Ok(JobDescription::new(json!({})))
        })
        .await
        .unwrap_err();

    assert!(err.is_submission_error());
    assert!(matches!(
        err,
        OrchestratorError::Submission {
            reason: SubmissionFailure::PredecessorNotFinished { .. },
            ..
        }
    ));
    assert_eq!(harness.service.submissions().await.len(), 1);
    assert_eq!(harness.service.output_requests().await, 0);
}

#[tokio::test]
async fn test_chain_builds_from_predecessor_outputs() {
    let harness = TestHarness::new();
    let mut encoding = harness
        .submit_encoding("enc-7", vec![fixtures::finished()])
        .await;
    harness
        .service
        .set_outputs(
            "enc-7",
            vec![
                fixtures::video_output("v1", 3_000_000),
                fixtures::audio_output("a1", 128_000, TrackRole::Main),
            ],
        )
        .await;
    harness.service.push_submission_id("hls-7").await;

    harness
        .orchestrator
        .poll_until_terminal(&mut encoding, &harness.policy(5))
        .await
        .unwrap();

    let manifest = harness
        .orchestrator
        .chain(&encoding, JobKind::HlsManifest, |id, outputs| {
            assert_eq!(id, &JobId::new("enc-7"));
            Ok(JobDescription::new(json!({
                "encoding": id.as_str(),
                "renditions": outputs.len(),
            })))
        })
        .await
        .unwrap();

    assert_eq!(manifest.id(), &JobId::new("hls-7"));
    assert_eq!(manifest.kind(), JobKind::HlsManifest);

    let submissions = harness.service.submissions().await;
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[1].kind, JobKind::HlsManifest);
    assert_eq!(
        submissions[1].description.payload,
        json!({ "encoding": "enc-7", "renditions": 2 })
    );
}

#[tokio::test]
async fn test_chain_builder_error_is_submission_error() {
    let harness = TestHarness::new();
    let mut encoding = harness
        .submit_encoding("enc-8", vec![fixtures::finished()])
        .await;
    harness
        .orchestrator
        .poll_until_terminal(&mut encoding, &harness.policy(5))
        .await
        .unwrap();

    let err = harness
        .orchestrator
        .chain(&encoding, JobKind::DashManifest, |_, _| {
            anyhow::bail!("no renditions")
        })
        .await
        .unwrap_err();

    match err {
        OrchestratorError::Submission {
            kind: JobKind::DashManifest,
            reason: SubmissionFailure::InvalidDescription(message),
        } => assert_eq!(message, "no renditions"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(harness.service.submissions().await.len(), 1);
}

// =============================================================================
// Persistent jobs
// =============================================================================

#[tokio::test]
async fn test_await_running_fails_fast_on_error() {
    let harness = TestHarness::new();
    harness
        .service
        .script_status(
            JobKind::LiveEncoding,
            "live-1",
            vec![fixtures::queued(), fixtures::failed(&["ingest unreachable"])],
        )
        .await;

    let err = harness
        .orchestrator
        .start_persistent(JobId::new("live-1"), &live_description(), &harness.policy(10))
        .await
        .unwrap_err();

    assert_eq!(err.error_messages(), &["ingest unreachable".to_string()]);
    assert_eq!(
        harness
            .service
            .status_requests(JobKind::LiveEncoding, "live-1")
            .await,
        2
    );
}

#[tokio::test]
async fn test_await_running_rejects_other_terminal_state() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding("enc-9", vec![fixtures::finished()])
        .await;

    let err = harness
        .orchestrator
        .await_state(&mut handle, JobStatus::Running, &harness.policy(5))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrchestratorError::UnexpectedTerminal {
            expected: JobStatus::Running,
            actual: JobStatus::Finished,
            ..
        }
    ));
}

#[tokio::test]
async fn test_stop_running_job_waits_for_finished() {
    let harness = TestHarness::new();
    let mut handle = harness
        .attach_live("live-2", vec![fixtures::queued(), fixtures::running(0.0)])
        .await;
    harness
        .service
        .script_after_stop("live-2", vec![fixtures::running(0.0), fixtures::finished()])
        .await;

    harness
        .orchestrator
        .stop(&mut handle, &harness.policy(5))
        .await
        .unwrap();

    assert!(handle.is_finished());
    assert_eq!(harness.service.started().await, vec![JobId::new("live-2")]);
    assert_eq!(harness.service.stopped().await, vec![JobId::new("live-2")]);
}

#[tokio::test]
async fn test_stop_finished_job_is_noop() {
    let harness = TestHarness::new();
    let mut handle = harness
        .attach_live("live-3", vec![fixtures::running(0.0)])
        .await;
    harness
        .service
        .script_after_stop("live-3", vec![fixtures::finished()])
        .await;
    let policy = harness.policy(5);

    harness.orchestrator.stop(&mut handle, &policy).await.unwrap();
    harness.orchestrator.stop(&mut handle, &policy).await.unwrap();

    assert_eq!(harness.service.stopped().await.len(), 1);
}

#[tokio::test]
async fn test_stop_failed_job_returns_failure_without_request() {
    let harness = TestHarness::new();
    let mut handle = harness
        .attach_live(
            "live-7",
            vec![fixtures::running(0.0), fixtures::failed(&["encoder crashed"])],
        )
        .await;
    let policy = harness.policy(5);

    harness
        .orchestrator
        .await_state(&mut handle, JobStatus::Finished, &policy)
        .await
        .unwrap_err();
    assert_eq!(handle.last_status(), Some(JobStatus::Error));

    let err = harness.orchestrator.stop(&mut handle, &policy).await.unwrap_err();

    assert!(matches!(err, OrchestratorError::JobFailed { .. }));
    assert_eq!(err.error_messages(), &["encoder crashed".to_string()]);
    assert!(harness.service.stopped().await.is_empty());
    assert_eq!(
        harness
            .service
            .status_requests(JobKind::LiveEncoding, "live-7")
            .await,
        2
    );
}

#[tokio::test]
async fn test_stop_finite_job_is_rejected() {
    let harness = TestHarness::new();
    let mut handle = harness
        .submit_encoding("enc-10", vec![fixtures::running(5.0)])
        .await;

    let err = harness
        .orchestrator
        .stop(&mut handle, &harness.policy(5))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::NotPersistent { .. }));
    assert!(harness.service.stopped().await.is_empty());
}

#[tokio::test]
async fn test_details_retry_until_available() {
    let harness = TestHarness::new();
    let handle = harness
        .attach_live("live-4", vec![fixtures::running(0.0)])
        .await;
    harness.service.fail_details("live-4", 3, 404).await;

    let details = harness
        .orchestrator
        .fetch_persistent_details(&handle, &harness.policy(5))
        .await
        .unwrap();

    assert_eq!(details, fixtures::live_details());
    assert_eq!(harness.service.details_requests().await, 4);
}

#[tokio::test]
async fn test_details_give_up_after_attempt_budget() {
    let harness = TestHarness::new();
    let handle = harness
        .attach_live("live-5", vec![fixtures::running(0.0)])
        .await;
    harness.service.fail_details("live-5", 10, 503).await;

    let err = harness
        .orchestrator
        .fetch_persistent_details(&handle, &harness.policy(3))
        .await
        .unwrap_err();

    match &err {
        OrchestratorError::TransientFetch {
            job_id, attempts, ..
        } => {
            assert_eq!(job_id, &JobId::new("live-5"));
            assert_eq!(*attempts, 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(harness.service.details_requests().await, 3);
}

#[tokio::test]
async fn test_details_permanent_failure_surfaces_immediately() {
    let harness = TestHarness::new();
    let handle = harness
        .attach_live("live-6", vec![fixtures::running(0.0)])
        .await;
    harness.service.fail_details("live-6", 1, 403).await;

    let err = harness
        .orchestrator
        .fetch_persistent_details(&handle, &harness.policy(5))
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Service { .. }));
    assert_eq!(harness.service.details_requests().await, 1);
}
