//! Forge collaborator port
//!
//! Everything prescan needs from the review system lives behind one
//! trait: resolving the repository's declared license, fetching a
//! scannable snapshot of the pull-request diff, and posting the
//! status callback. The pipeline never talks HTTP directly.

pub mod github;

use std::path::PathBuf;

use serde::Serialize;

use crate::models::ScanJob;
use crate::scanner::ScanError;

pub use github::GithubClient;

/// Outcome reported through the status callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallbackStatus {
    /// Job claimed, scan in flight
    Scanning,
    /// Scanned, no conflicts found
    Completed,
    /// Scanned, at least one conflicting license
    IssuesDetected,
    /// Terminal failure: the pull request could not be scanned
    CannotBeScanned,
}

impl CallbackStatus {
    /// Status string used on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scanning => "scanning",
            Self::Completed => "completed",
            Self::IssuesDetected => "issues-detected",
            Self::CannotBeScanned => "cannot-be-scanned",
        }
    }
}

impl std::fmt::Display for CallbackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review-system abstraction
pub trait ForgeClient: Send + Sync {
    /// Declared license of the job's repository, if any.
    ///
    /// `None` means the repository declares no license; a transport
    /// failure is [`ScanError::LicenseResolution`] (retryable).
    fn repository_license(&self, job: &ScanJob) -> Result<Option<String>, ScanError>;

    /// Materialize the pull-request diff as a filesystem snapshot and
    /// return its root directory.
    fn fetch_snapshot(&self, job: &ScanJob) -> Result<PathBuf, ScanError>;

    /// Post the status callback for a job. Best-effort: the caller
    /// logs failures and never rolls back job state over them.
    fn post_status(
        &self,
        job: &ScanJob,
        status: CallbackStatus,
        has_issue: Option<bool>,
        result_url: Option<&str>,
    ) -> anyhow::Result<()>;
}
