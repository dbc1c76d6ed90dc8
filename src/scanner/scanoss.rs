//! scanoss-py scanner adapter
//!
//! Invokes the `scanoss-py` CLI as an isolated subprocess and caches
//! its raw report per (repository, commit SHA) so a service restart
//! can recover a finished scan without re-running the tool.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use crate::models::ScanJob;
use crate::paths;

use super::{ScanError, Scanner};

/// Poll interval while waiting for the subprocess
const WAIT_POLL: Duration = Duration::from_millis(200);

/// Scanner backed by the `scanoss-py` CLI
#[derive(Debug, Clone)]
pub struct ScanossScanner {
    command: String,
    timeout_secs: u64,
    reports_dir: PathBuf,
}

impl ScanossScanner {
    /// Create a scanner writing reports under `reports_dir`
    #[must_use]
    pub fn new(command: impl Into<String>, timeout_secs: u64, reports_dir: PathBuf) -> Self {
        Self {
            command: command.into(),
            timeout_secs,
            reports_dir,
        }
    }

    /// Report location for a job, keyed by (repository name, SHA)
    #[must_use]
    pub fn report_path(&self, job: &ScanJob) -> PathBuf {
        paths::report_file(&self.reports_dir, job.repository_name(), &job.head_commit_sha)
    }

    /// A cached report usable instead of a fresh scan: it must exist
    /// and be newer than the job's enqueue time.
    fn cached_report(&self, job: &ScanJob) -> Option<PathBuf> {
        let path = self.report_path(job);
        let modified = path.metadata().and_then(|m| m.modified()).ok()?;
        let enqueued = DateTime::parse_from_rfc3339(&job.scan_date).ok()?;
        if DateTime::<Utc>::from(modified) > enqueued {
            Some(path)
        } else {
            None
        }
    }

    /// Run the tool against `tree`, writing the raw report to `report`.
    ///
    /// Used directly by the one-off `scan` command; the [`Scanner`]
    /// impl adds caching and job-keyed report paths on top.
    pub fn scan_tree(&self, tree: &Path, report: &Path) -> Result<(), ScanError> {
        if !tree.exists() {
            return Err(ScanError::SnapshotUnavailable(format!(
                "snapshot path does not exist: {}",
                tree.display()
            )));
        }
        if let Some(parent) = report.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ScanError::ScannerUnavailable(format!("cannot create report dir: {e}")))?;
        }

        let mut child = Command::new(&self.command)
            .arg("scan")
            .arg("-q")
            .arg("--no-wfp-output")
            .arg("-o")
            .arg(report)
            .arg(tree)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ScanError::ScannerUnavailable(format!("{}: {e}", self.command)))?;

        let deadline = Instant::now() + Duration::from_secs(self.timeout_secs);
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        // Timeout handling kills the subprocess; the
                        // attempt is counted as failed, not cancelled.
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(ScanError::ScannerTimeout(self.timeout_secs));
                    }
                    std::thread::sleep(WAIT_POLL);
                },
                Err(e) => {
                    return Err(ScanError::ScannerUnavailable(format!("wait failed: {e}")));
                },
            }
        };

        if !status.success() {
            let stderr = child
                .stderr
                .take()
                .and_then(|mut s| {
                    use std::io::Read as _;
                    let mut buf = String::new();
                    s.read_to_string(&mut buf).ok().map(|_| buf)
                })
                .unwrap_or_default();
            return Err(ScanError::ScannerUnavailable(format!(
                "{} exited with {status}: {}",
                self.command,
                stderr.lines().next().unwrap_or("")
            )));
        }
        Ok(())
    }
}

impl Scanner for ScanossScanner {
    fn scan(&self, job: &ScanJob, snapshot: &Path) -> Result<PathBuf, ScanError> {
        if let Some(cached) = self.cached_report(job) {
            log::debug!("Reusing cached report for {} at {}", job.id, cached.display());
            return Ok(cached);
        }

        let report = self.report_path(job);
        log::debug!(
            "Scanning {} ({}@{}) into {}",
            job.id,
            job.repository_name(),
            job.head_commit_sha,
            report.display()
        );
        self.scan_tree(snapshot, &report)?;
        log::debug!("Scan done for {}", job.id);
        Ok(report)
    }
}
