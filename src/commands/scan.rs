//! `prescan scan` - one-off scan of a local directory

use std::path::Path;

use chrono::Utc;

use crate::classify;
use crate::models::ScanResult;
use crate::output::{OutputMode, ScanReport};
use crate::policy::PolicyStore;
use crate::report;
use crate::scanner::ScanossScanner;

/// Scan `path` once, classify against the policy, print verdicts.
///
/// Exits non-zero when a conflicting license is found so the command
/// can gate CI jobs.
pub fn scan(
    path: &Path,
    repo_license: Option<&str>,
    policy_path: Option<&Path>,
    output_mode: OutputMode,
) -> anyhow::Result<()> {
    let policy = match policy_path {
        Some(p) => PolicyStore::load(p)?,
        None => PolicyStore::builtin(),
    };

    let report_file = std::env::temp_dir().join(format!("prescan-{}.json", std::process::id()));
    let scanner = ScanossScanner::new("scanoss-py", 600, std::env::temp_dir());
    scanner.scan_tree(path, &report_file)?;

    let content = std::fs::read_to_string(&report_file)?;
    let _ = std::fs::remove_file(&report_file);

    let matches = report::parse_report(&content)?;
    let verdicts = classify::classify(repo_license, &matches, &policy);
    let has_issue = classify::has_issue(&verdicts);
    let license_counts = classify::license_counts(&verdicts);

    let result = ScanResult {
        job_id: "local".to_string(),
        pull_request_url: String::new(),
        head_commit_sha: String::new(),
        repository: path.display().to_string(),
        verdicts,
        license_counts,
        has_issue,
        finished_at: Utc::now().to_rfc3339(),
    };

    ScanReport { result }.render(output_mode);

    if has_issue {
        anyhow::bail!("license issues detected");
    }
    Ok(())
}
