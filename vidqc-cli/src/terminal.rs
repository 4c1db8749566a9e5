//! Terminal output for command results.
//!
//! Logs go to stderr; the result of each command (status, event count,
//! report location) is printed to stdout. Colors are disabled when
//! `NO_COLOR` is set.

use owo_colors::OwoColorize;
use std::path::Path;
use vidqc_core::{DetectorReport, Event, MasterReport, OverallStatus, PipelineSummary, format_timestamp};

const RULE: &str = "==========================================";

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

fn paint_status(status: &str) -> String {
    if !should_use_color() {
        return status.to_string();
    }
    match status {
        "PASSED" => status.green().bold().to_string(),
        "REJECTED" => status.red().bold().to_string(),
        _ => status.yellow().to_string(),
    }
}

fn event_line(event: &Event) -> String {
    let start = event
        .start_time
        .map_or_else(|| "--:--:--.--".to_string(), format_timestamp);
    let module = event.source_module.as_deref().unwrap_or("-");
    let kind = event.kind.as_deref().unwrap_or("<untyped>");
    let text = event
        .detail("text")
        .and_then(|v| v.as_str())
        .map(|t| format!(" \"{t}\""))
        .unwrap_or_default();
    format!("  [{start}] {module}: {kind}{text}")
}

/// Prints the result of a single detector command.
pub fn print_detector_result(report: &DetectorReport, output: &Path) {
    println!(
        "[{}] {} ({} event(s)) -> {}",
        report.module,
        paint_status(report.status.as_str()),
        report.events.len(),
        output.display()
    );
}

/// Prints the Master Report summary.
pub fn print_master_summary(master: &MasterReport, path: &Path) {
    println!("{RULE}");
    println!(" QC COMPLETED");
    println!(" Overall Status: {}", paint_status(master.overall_status.as_str()));
    println!(" Modules Run: {}", master.modules_run);
    println!(" Events Found: {}", master.timeline.len());
    println!(" Report Location: {}", path.display());
    println!("{RULE}");
    for event in &master.timeline {
        println!("{}", event_line(event));
    }
}

/// Prints per-detector outcomes followed by the Master Report summary.
pub fn print_pipeline_summary(summary: &PipelineSummary) {
    println!("Input: {}", summary.input.display());
    for run in &summary.runs {
        match &run.outcome {
            Ok((status, events)) => {
                let mark = if should_use_color() {
                    "✓".green().to_string()
                } else {
                    "✓".to_string()
                };
                println!("  {mark} {}: {} ({events} event(s))", run.module, paint_status(status));
            }
            Err(e) => {
                let mark = if should_use_color() {
                    "✗".red().to_string()
                } else {
                    "✗".to_string()
                };
                println!("  {mark} {}: failed, no report ({e})", run.module);
            }
        }
    }
    print_master_summary(&summary.master, &summary.master_path);
    if summary.master.overall_status == OverallStatus::Rejected {
        println!("Asset REJECTED; see the timeline above.");
    }
}

/// Prints a fatal error to stderr.
pub fn print_error(message: &str) {
    if should_use_color() {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {message}");
    }
}
