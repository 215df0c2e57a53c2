//! Human-readable terminal formatting.
//!
//! Functions here only build strings; output sinks decide where they go.

use console::style;

use crate::domain::{ReleaseDecision, SemVer};

/// Format an error message in red.
pub fn error_line(message: &str) -> String {
    format!("{} {}", style("ERROR:").red().bold(), message)
}

/// Format a success message with green checkmark.
pub fn success_line(message: &str) -> String {
    format!("{} {}", style("✓").green(), message)
}

/// Format a status message with yellow arrow.
pub fn status_line(message: &str) -> String {
    format!("{} {}", style("→").yellow(), message)
}

/// One-line summary of a release decision.
pub fn decision_line(decision: &ReleaseDecision, current: SemVer, next: SemVer) -> String {
    match decision {
        ReleaseDecision::BumpAvailable => success_line(&format!(
            "{}: {} -> {}",
            decision,
            style(current).red(),
            style(next).green()
        )),
        ReleaseDecision::NoBumpNeeded => status_line(&format!("{} (at {})", decision, current)),
        ReleaseDecision::Blocked(_) => error_line(&decision.to_string()),
    }
}
