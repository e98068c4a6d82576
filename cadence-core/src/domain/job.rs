//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier assigned to a job by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of remote job
///
/// Each kind lives in its own resource collection on the remote service and
/// has its own status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// File-based transcode
    Encoding,
    /// HLS manifest generation for a finished encoding
    HlsManifest,
    /// DASH manifest generation for a finished encoding
    DashManifest,
    /// Live encoding session, runs until explicitly stopped
    LiveEncoding,
}

impl JobKind {
    /// Path segment of this kind's collection in the remote API
    pub fn path_segment(&self) -> &'static str {
        match self {
            JobKind::Encoding => "encodings",
            JobKind::HlsManifest => "manifests/hls",
            JobKind::DashManifest => "manifests/dash",
            JobKind::LiveEncoding => "live",
        }
    }

    /// Persistent jobs stay RUNNING until a stop is requested
    pub fn is_persistent(&self) -> bool {
        matches!(self, JobKind::LiveEncoding)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobKind::Encoding => "encoding",
            JobKind::HlsManifest => "hls-manifest",
            JobKind::DashManifest => "dash-manifest",
            JobKind::LiveEncoding => "live-encoding",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for JobKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "encoding" => Ok(JobKind::Encoding),
            "hls" | "hls-manifest" => Ok(JobKind::HlsManifest),
            "dash" | "dash-manifest" => Ok(JobKind::DashManifest),
            "live" | "live-encoding" => Ok(JobKind::LiveEncoding),
            other => Err(format!("unknown job kind '{}'", other)),
        }
    }
}

/// Job execution status as reported by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    #[serde(alias = "CREATED")]
    Queued,
    Running,
    Finished,
    Error,
}

impl JobStatus {
    /// FINISHED and ERROR are terminal; no transition leaves them
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Running => "RUNNING",
            JobStatus::Finished => "FINISHED",
            JobStatus::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// Description of a unit of remote work
///
/// The payload is opaque to the orchestrator and forwarded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDescription {
    pub name: Option<String>,
    pub payload: serde_json::Value,
}

impl JobDescription {
    pub fn new(payload: serde_json::Value) -> Self {
        Self {
            name: None,
            payload,
        }
    }

    /// Build a description from any serializable payload
    pub fn from_payload<T: Serialize>(payload: &T) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::to_value(payload)?))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
