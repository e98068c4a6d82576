//! Testing utilities for code that drives jobs.
//!
//! Provides a scripted [`JobService`](cadence_client::JobService) so that
//! orchestration can be exercised without a remote service.
//!
//! # Example
//!
//! ```rust,ignore
//! use cadence_orchestrator::testing::{fixtures, MockJobService};
//!
//! let service = MockJobService::new();
//! service.push_submission_id("enc-1").await;
//! service
//!     .script_status(JobKind::Encoding, "enc-1", vec![fixtures::running(10.0), fixtures::finished()])
//!     .await;
//! ```

mod mock_service;

pub use mock_service::{MockJobService, RecordedSubmission};

/// Report and output builders for tests.
pub mod fixtures {
    use cadence_core::domain::artifact::{ArtifactRole, OutputLocation, TrackRole};
    use cadence_core::domain::job::JobStatus;
    use cadence_core::domain::live::LiveDetails;
    use cadence_core::domain::report::{Message, ProgressReport};

    pub fn queued() -> ProgressReport {
        ProgressReport::new(JobStatus::Queued)
    }

    pub fn running(progress: f32) -> ProgressReport {
        ProgressReport::new(JobStatus::Running).with_progress(progress)
    }

    pub fn finished() -> ProgressReport {
        ProgressReport::new(JobStatus::Finished).with_progress(100.0)
    }

    /// ERROR report with one ERROR message per entry, preceded by an INFO one
    pub fn failed(errors: &[&str]) -> ProgressReport {
        errors.iter().fold(
            ProgressReport::new(JobStatus::Error).with_message(Message::info("job started")),
            |report, text| report.with_message(Message::error(*text)),
        )
    }

    pub fn video_output(id: &str, bitrate: u64) -> OutputLocation {
        OutputLocation::new(
            format!("mux-{}", id),
            format!("stream-{}", id),
            format!("output/video/{}", bitrate),
            ArtifactRole::Video,
        )
        .with_bitrate(bitrate)
    }

    pub fn audio_output(id: &str, bitrate: u64, track: TrackRole) -> OutputLocation {
        OutputLocation::new(
            format!("mux-{}", id),
            format!("stream-{}", id),
            format!("output/audio/{}", bitrate),
            ArtifactRole::Audio,
        )
        .with_bitrate(bitrate)
        .with_language("en")
        .with_track(track)
    }

    pub fn live_details() -> LiveDetails {
        LiveDetails {
            encoder_ip: "198.51.100.20".to_string(),
            stream_key: "mock-stream-key".to_string(),
            application: None,
        }
    }
}
