// src/report.rs
// =============================================================================
// Console reporting: per-link result lines, log prefixes, and the final
// summary. Human-readable output only; `colored` drops the ANSI codes by
// itself when stdout is not a terminal.
// =============================================================================

use colored::Colorize;
use std::path::Path;

use crate::checker::CheckOutcome;

pub fn log_info(message: &str) {
    println!("{} {}", "[INFO]".blue(), message);
}

pub fn log_success(message: &str) {
    println!("{} {}", "[SUCCESS]".green(), message);
}

pub fn log_error(message: &str) {
    println!("{} {}", "[ERROR]".red(), message);
}

/// Printed once per file that contains links.
pub fn file_header(path: &Path) {
    println!();
    println!("{}", format!("Checking {}:", path.display()).bold());
}

/// One line per validated occurrence, tagged ok or broken.
pub fn outcome_line(line: usize, url: &str, outcome: &CheckOutcome) {
    let tag = if outcome.ok { "✅" } else { "❌" };
    println!("  {} Line {}: {} - {}", tag, line, url, outcome.message);
}

/// One line per occurrence that was never checked.
pub fn skipped_line(line: usize, url: &str, reason: &str) {
    println!("  ⏭️  Line {}: {} - {}", line, url, reason);
}

/// Counters accumulated across the whole run; the broken count decides the
/// process exit status.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub total: usize,
    pub broken: usize,
}

impl RunSummary {
    pub fn print(&self) {
        println!();
        println!("{}", "Summary:".bold());
        println!("Total links checked: {}", self.total);
        println!("Broken links found: {}", self.broken);
    }
}
