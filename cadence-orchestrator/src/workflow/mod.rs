//! End-to-end workflows composed from orchestrator operations

pub mod live;
pub mod vod;

pub use live::{LiveSession, LiveWorkflow};
pub use vod::{ManifestRequest, VodOutcome, VodRequest, VodWorkflow};
