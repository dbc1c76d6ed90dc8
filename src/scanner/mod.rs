//! Scanner invocation port
//!
//! The external scanning tool is an opaque subprocess: snapshot in,
//! raw JSON report out, bounded by a wall-clock timeout. The trait
//! keeps the orchestrator independent of the concrete tool so an
//! alternative scanner can be substituted without touching it.

pub mod scanoss;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::ScanJob;

pub use scanoss::ScanossScanner;

/// Errors produced while driving a scan
#[derive(Debug, Error)]
pub enum ScanError {
    /// Tool missing or unexpected non-zero exit (retryable)
    #[error("scanner unavailable: {0}")]
    ScannerUnavailable(String),
    /// Exceeded the configured wall-clock budget (retryable)
    #[error("scanner timed out after {0}s")]
    ScannerTimeout(u64),
    /// Source checkout / diff download failed (retryable)
    #[error("snapshot unavailable: {0}")]
    SnapshotUnavailable(String),
    /// Transient failure resolving the repository license (retryable)
    #[error("failed to resolve repository license: {0}")]
    LicenseResolution(String),
    /// Report top-level structure could not be parsed (permanent)
    #[error("malformed scanner report: {0}")]
    MalformedReport(String),
}

impl ScanError {
    /// Whether the orchestrator should requeue the job after this error
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::MalformedReport(_))
    }
}

/// Source-scanning tool abstraction
///
/// Implementations run the tool against a prepared filesystem snapshot
/// and return the path of the raw report they wrote.
pub trait Scanner: Send + Sync {
    /// Scan the snapshot for the given job, returning the report path
    fn scan(&self, job: &ScanJob, snapshot: &Path) -> Result<PathBuf, ScanError>;
}
