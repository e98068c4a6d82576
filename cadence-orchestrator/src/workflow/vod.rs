//! Video-on-demand workflow
//!
//! Encodes once, then generates each requested manifest from the finished
//! encoding's outputs, one after another.

use anyhow::Context;
use cadence_core::domain::job::{JobDescription, JobKind};
use cadence_core::domain::manifest::{ManifestFormat, ManifestPlan};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::handle::JobHandle;
use crate::orchestrator::JobOrchestrator;

/// One manifest to generate after encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRequest {
    pub format: ManifestFormat,
    /// Directory the manifest is written to, relative to the output root
    pub output_path: String,
    /// Defaults to the format's standard file name
    #[serde(default)]
    pub manifest_name: Option<String>,
}

impl ManifestRequest {
    pub fn new(format: ManifestFormat, output_path: impl Into<String>) -> Self {
        Self {
            format,
            output_path: output_path.into(),
            manifest_name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = Some(name.into());
        self
    }
}

/// Everything a VOD run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VodRequest {
    pub encoding: JobDescription,
    #[serde(default)]
    pub manifests: Vec<ManifestRequest>,
}

/// Settled handles of a VOD run
#[derive(Debug)]
pub struct VodOutcome {
    pub encoding: JobHandle,
    /// In request order
    pub manifests: Vec<JobHandle>,
}

pub struct VodWorkflow {
    orchestrator: JobOrchestrator,
}

impl VodWorkflow {
    pub fn new(orchestrator: JobOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Runs the encoding and every manifest to completion
    ///
    /// Stops at the first failure; manifests after it are not submitted.
    pub async fn run(&self, request: &VodRequest) -> Result<VodOutcome> {
        let policy = self.orchestrator.policy();

        let encoding = self
            .orchestrator
            .run(JobKind::Encoding, &request.encoding)
            .await?;
        info!("Encoding {} finished", encoding.id());

        let mut manifests = Vec::with_capacity(request.manifests.len());
        for manifest in &request.manifests {
            let kind = manifest.format.job_kind();
            let mut handle = self
                .orchestrator
                .chain(&encoding, kind, |encoding_id, outputs| {
                    let mut plan = ManifestPlan::from_outputs(
                        manifest.format,
                        encoding_id.clone(),
                        manifest.output_path.clone(),
                        outputs,
                    );
                    if let Some(name) = &manifest.manifest_name {
                        plan = plan.with_manifest_name(name.clone());
                    }
                    if plan.renditions.is_empty() {
                        anyhow::bail!("encoding {} produced no usable renditions", encoding_id);
                    }
                    JobDescription::from_payload(&plan)
                        .map(|d| d.named(plan.manifest_name.clone()))
                        .context("Failed to serialize manifest plan")
                })
                .await?;

            self.orchestrator
                .poll_until_terminal(&mut handle, &policy)
                .await?;
            info!("{} {} finished", kind, handle.id());
            manifests.push(handle);
        }

        Ok(VodOutcome {
            encoding,
            manifests,
        })
    }
}
