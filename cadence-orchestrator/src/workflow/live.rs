//! Live encoding workflow

use cadence_core::domain::job::{JobDescription, JobId};
use cadence_core::domain::live::LiveDetails;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::handle::JobHandle;
use crate::orchestrator::JobOrchestrator;

/// A running live encoding and where to send its input
#[derive(Debug)]
pub struct LiveSession {
    pub handle: JobHandle,
    pub details: LiveDetails,
}

pub struct LiveWorkflow {
    orchestrator: JobOrchestrator,
}

impl LiveWorkflow {
    pub fn new(orchestrator: JobOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Starts the encoding and waits until ingest details are available
    ///
    /// An encoding that starts but never exposes its details is stopped
    /// again before the error is returned.
    pub async fn start(&self, id: JobId, description: &JobDescription) -> Result<LiveSession> {
        let policy = self.orchestrator.live_policy();

        let mut handle = self
            .orchestrator
            .start_persistent(id, description, &policy)
            .await?;
        let details = match self
            .orchestrator
            .fetch_persistent_details(&handle, &policy)
            .await
        {
            Ok(details) => details,
            Err(e) => {
                warn!(
                    "No ingest details for live encoding {}, stopping it: {}",
                    handle.id(),
                    e
                );
                if let Err(stop_err) = self.orchestrator.stop(&mut handle, &policy).await {
                    error!(
                        "Failed to stop live encoding {}: {}",
                        handle.id(),
                        stop_err
                    );
                }
                return Err(e);
            }
        };

        info!(
            "Live encoding {} is ready for ingest at {} (stream key {})",
            handle.id(),
            details.rtmp_url(),
            details.stream_key
        );
        Ok(LiveSession { handle, details })
    }

    /// Stops the encoding and waits for it to finish
    pub async fn shutdown(&self, session: &mut LiveSession) -> Result<()> {
        let policy = self.orchestrator.policy();
        self.orchestrator.stop(&mut session.handle, &policy).await
    }
}
