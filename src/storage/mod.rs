//! Storage abstraction for jobs and scan results
//!
//! The pipeline only needs CRUD plus query-by-status; the traits keep
//! the queue and orchestrator independent of the concrete store so
//! tests can swap in in-memory fakes.

pub mod jobs;
pub mod results;

use crate::models::{ScanJob, ScanResult};

pub use jobs::FileJobStore;
pub use results::FileResultStore;

/// Durable store for job records
///
/// Jobs are append-only from the store's point of view: `save`
/// creates or overwrites one record, nothing is ever deleted.
pub trait JobStore: Send + Sync {
    /// Persist one job record (create or overwrite)
    fn save(&self, job: &ScanJob) -> anyhow::Result<()>;

    /// Load every persisted job record
    fn load_all(&self) -> anyhow::Result<Vec<ScanJob>>;
}

/// Store for immutable scan results
pub trait ResultStore: Send + Sync {
    /// Persist one result, keyed by job id
    fn save(&self, result: &ScanResult) -> anyhow::Result<()>;

    /// Load the result for one job, if present
    fn load(&self, job_id: &str) -> anyhow::Result<Option<ScanResult>>;

    /// All results for one `org/name` repository slug, newest first
    fn for_repository(&self, repository: &str) -> anyhow::Result<Vec<ScanResult>>;

    /// Every persisted result (dashboard aggregation)
    fn load_all(&self) -> anyhow::Result<Vec<ScanResult>>;
}
