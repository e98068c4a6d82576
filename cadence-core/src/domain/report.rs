//! Progress report domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::job::JobStatus;

/// Severity of a diagnostic message attached to a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageSeverity {
    Info,
    #[serde(alias = "WARN")]
    Warning,
    Error,
}

/// A diagnostic message reported by the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub severity: MessageSeverity,
    pub text: String,
}

impl Message {
    pub fn new(severity: MessageSeverity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageSeverity::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageSeverity::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageSeverity::Error, text)
    }
}

/// Snapshot of a job's status at one poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub status: JobStatus,
    /// Completion percentage (0-100), when the service reports one
    pub progress: Option<f32>,
    /// Diagnostics in the order the service emitted them
    pub messages: Vec<Message>,
    pub observed_at: DateTime<Utc>,
}

impl ProgressReport {
    pub fn new(status: JobStatus) -> Self {
        Self {
            status,
            progress: None,
            messages: Vec::new(),
            observed_at: Utc::now(),
        }
    }

    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Text of every ERROR-severity message, in original order
    ///
    /// Returns an empty list when the job reported no errors.
    pub fn error_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .filter(|m| m.severity == MessageSeverity::Error)
            .map(|m| m.text.clone())
            .collect()
    }
}
