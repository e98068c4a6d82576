//! Cadence orchestrator library
//!
//! Submits jobs to a remote encoding service, polls them at a fixed interval
//! until they settle, chains dependent jobs and drives the start/stop
//! protocol of live encodings.

pub mod config;
pub mod error;
pub mod handle;
pub mod orchestrator;
pub mod testing;
pub mod workflow;

pub use config::{OrchestratorConfig, PollPolicy};
pub use error::{OrchestratorError, Result, SubmissionFailure};
pub use handle::JobHandle;
pub use orchestrator::{JobOrchestrator, extract_errors};
pub use workflow::{
    LiveSession, LiveWorkflow, ManifestRequest, VodOutcome, VodRequest, VodWorkflow,
};
