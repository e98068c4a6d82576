//! VOD command handler

use anyhow::Result;
use cadence_orchestrator::{VodRequest, VodWorkflow};
use colored::*;

use super::display::{print_failure, print_handle};
use super::read_json;
use crate::config::Config;

/// Encode a title and generate its manifests
pub async fn run_vod(request_path: &str, config: &Config) -> Result<()> {
    let request: VodRequest = read_json(request_path)?;
    let workflow = VodWorkflow::new(config.orchestrator()?);

    println!(
        "{}",
        format!(
            "Encoding with {} manifest(s) to follow...",
            request.manifests.len()
        )
        .dimmed()
    );

    match workflow.run(&request).await {
        Ok(outcome) => {
            println!("{}", "✓ VOD workflow finished".green().bold());
            print_handle(&outcome.encoding);
            for manifest in &outcome.manifests {
                print_handle(manifest);
            }
            Ok(())
        }
        Err(e) => {
            print_failure(&e);
            Err(e.into())
        }
    }
}
