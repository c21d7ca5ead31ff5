//! Pure formatting functions for UI output.
//!
//! Status lines go to stderr so that stdout carries only command results
//! (a version, a tag list, a summary) and stays safe to capture in CI.

use chrono::{DateTime, Utc};
use console::style;

use crate::boundary::BoundaryWarning;
use crate::manifest::PatchReport;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the lines a manifest patch rewrote or inserted.
///
/// Rewritten lines show old and new content; inserted lines only the new.
pub fn display_patch_changes(report: &PatchReport) {
    for change in &report.changes {
        match &change.before {
            Some(before) => {
                eprintln!("  {:>4} {} {}", change.line, style("-").red(), before.trim());
                eprintln!("  {:>4} {} {}", change.line, style("+").green(), change.after.trim());
            }
            None => {
                eprintln!("  {:>4} {} {}", change.line, style("+").green(), change.after.trim());
            }
        }
    }
}

/// Everything the `summary` command reports
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSummary {
    pub service: String,
    pub version: String,
    pub commit_sha: String,
    pub branch: String,
    pub build_number: usize,
    pub is_release: bool,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Format a UTC timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Render a build summary as a Markdown block, suitable for a CI job summary.
pub fn render_summary(summary: &BuildSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("## Build Summary: {}\n\n", summary.service));
    out.push_str("| Property | Value |\n");
    out.push_str("|----------|-------|\n");
    out.push_str(&format!("| Version | `{}` |\n", summary.version));
    out.push_str(&format!("| Commit SHA | `{}` |\n", summary.commit_sha));
    out.push_str(&format!("| Branch | `{}` |\n", summary.branch));
    out.push_str(&format!("| Build Number | {} |\n", summary.build_number));
    out.push_str(&format!("| Release Build | {} |\n", summary.is_release));
    out.push_str(&format!(
        "| Timestamp | {} |\n",
        format_timestamp(&summary.timestamp)
    ));

    out.push_str("\n### Container Tags\n\n");
    for tag in &summary.tags {
        out.push_str(&format!("- `{}`\n", tag));
    }

    out
}
