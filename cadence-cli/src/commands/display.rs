//! Terminal rendering shared by command handlers

use cadence_core::domain::job::JobStatus;
use cadence_core::domain::report::{MessageSeverity, ProgressReport};
use cadence_orchestrator::{JobHandle, OrchestratorError};
use colored::*;

/// Colorize job status for display
pub fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Queued => status_str.yellow(),
        JobStatus::Running => status_str.cyan(),
        JobStatus::Finished => status_str.green(),
        JobStatus::Error => status_str.red(),
    }
}

/// Print one status snapshot
pub fn print_report(report: &ProgressReport) {
    println!("  Status:   {}", colorize_status(report.status));
    if let Some(progress) = report.progress {
        println!("  Progress: {:.0}%", progress);
    }
    println!(
        "  Observed: {}",
        report
            .observed_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );

    if !report.messages.is_empty() {
        println!("\n{}", "Messages:".bold());
        for message in &report.messages {
            let severity = match message.severity {
                MessageSeverity::Info => "INFO".dimmed(),
                MessageSeverity::Warning => "WARN".yellow(),
                MessageSeverity::Error => "ERROR".red(),
            };
            println!("  [{}] {}", severity, message.text);
        }
    }
}

/// Print a one-line summary of a settled job
pub fn print_handle(handle: &JobHandle) {
    let status = handle
        .last_status()
        .map(colorize_status)
        .unwrap_or_else(|| "UNKNOWN".dimmed());
    println!(
        "  {} {} {} {}",
        "▸".cyan(),
        handle.kind().to_string().bold(),
        handle.id().to_string().dimmed(),
        status
    );
}

/// Print an orchestration failure with any job error messages
pub fn print_failure(err: &OrchestratorError) {
    println!("{} {}", "✗".red(), err.to_string().red());
    for message in err.error_messages() {
        println!("    {}", message.red());
    }
}
