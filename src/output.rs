//! Output formatting for human and JSON modes
//!
//! Structured output that renders either as human-readable text or
//! machine-parseable JSON, selected once at CLI startup.

use colored::Colorize;
use serde::Serialize;

use crate::models::{LicensePolicy, ScanResult, VerdictStatus};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

/// Result of a one-off scan, ready for rendering
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// The scan result being rendered
    pub result: ScanResult,
}

impl ScanReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => render_json(self),
        }
    }

    fn render_human(&self) {
        let r = &self.result;
        if r.verdicts.is_empty() {
            println!("No licenses detected.");
            return;
        }

        println!("Scanned {} file match(es):\n", r.verdicts.len());
        for verdict in &r.verdicts {
            let label = match verdict.status {
                VerdictStatus::Conflicting => "CONFLICT".red().bold(),
                VerdictStatus::Unreviewed => "UNREVIEWED".yellow(),
                VerdictStatus::Permitted => "ok".green(),
            };
            println!("  [{label}] {} - {}", verdict.matched.license, verdict.matched.file_path);
            if let Some(rule) = &verdict.rule {
                println!("           conflicts: {rule}");
            }
        }

        println!();
        if r.has_issue {
            println!("{}", "License issues detected.".red().bold());
        } else {
            println!("{}", "No license issues.".green());
        }
    }
}

/// Policy listing, ready for rendering
#[derive(Debug, Serialize)]
pub struct PolicyListing {
    /// Licenses in the policy
    pub licenses: Vec<LicensePolicy>,
}

impl PolicyListing {
    /// Render the listing based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => render_json(self),
        }
    }

    fn render_human(&self) {
        if self.licenses.is_empty() {
            println!("Policy is empty.");
            return;
        }
        println!("Licenses ({}):\n", self.licenses.len());
        for license in &self.licenses {
            println!("  {} ({}) - {}", license.spdx_id, license.name, license.access);
            if !license.incompatible_with.is_empty() {
                println!("      incompatible with: {}", license.incompatible_with.join(", "));
            }
        }
    }
}

fn render_json<T: Serialize>(data: &T) {
    println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
}
