//! Centralized path definitions for prescan
//!
//! Single source of truth for the on-disk layout of the service state.
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.prescan/                      # state dir (configurable)
//! ├── jobs/                        # durable job records
//! │   ├── JOB-1.json
//! │   └── JOB-2.json
//! ├── results/                     # immutable scan results
//! │   └── JOB-1.json
//! ├── reports/                     # raw scanner reports (cache)
//! │   └── <repo>/<sha>.json
//! └── snapshots/                   # materialized PR diffs
//!     └── <repo>/<sha>/...
//! ```
//!
//! Reports and snapshots are keyed by (repository name, commit SHA) so
//! concurrent workers never write-collide on the same key and a
//! restart can pick up a finished report without re-scanning.

use std::path::{Path, PathBuf};

/// Directory name for service state under the home directory
const STATE_DIR: &str = ".prescan";

/// Default service configuration filename
pub const CONFIG_FILE: &str = "prescan.toml";

/// Job records subdirectory
const JOBS_DIR: &str = "jobs";

/// Scan results subdirectory
const RESULTS_DIR: &str = "results";

/// Raw report cache subdirectory
const REPORTS_DIR: &str = "reports";

/// Snapshot checkout subdirectory
const SNAPSHOTS_DIR: &str = "snapshots";

/// Default state directory: `~/.prescan/`
#[must_use]
pub fn default_state_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(STATE_DIR)
}

/// Job records directory under the given state dir
#[must_use]
pub fn jobs_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(JOBS_DIR)
}

/// Scan results directory under the given state dir
#[must_use]
pub fn results_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(RESULTS_DIR)
}

/// Raw report cache directory under the given state dir
#[must_use]
pub fn reports_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(REPORTS_DIR)
}

/// Snapshot root directory under the given state dir
#[must_use]
pub fn snapshots_dir(state_dir: &Path) -> PathBuf {
    state_dir.join(SNAPSHOTS_DIR)
}

/// Raw report file for one (repository, commit) pair
#[must_use]
pub fn report_file(reports_dir: &Path, repository: &str, sha: &str) -> PathBuf {
    reports_dir.join(sanitize(repository)).join(format!("{}.json", sanitize(sha)))
}

/// Snapshot directory for one (repository, commit) pair
#[must_use]
pub fn snapshot_dir(snapshots_dir: &Path, repository: &str, sha: &str) -> PathBuf {
    snapshots_dir.join(sanitize(repository)).join(sanitize(sha))
}

/// Strip path separators out of URL-derived components
fn sanitize(component: &str) -> String {
    component.replace(['/', '\\'], "_")
}
