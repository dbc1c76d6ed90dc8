//! Mock implementations of port traits for testing
//!
//! Configurable behavior without real I/O or network: in-memory
//! stores, a scanner that hands back a prepared report, and a forge
//! that records every status callback.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use prescan::forge::{CallbackStatus, ForgeClient};
use prescan::models::{ScanJob, ScanResult};
use prescan::scanner::{ScanError, Scanner};
use prescan::storage::{JobStore, ResultStore};

/// In-memory job store
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: Mutex<BTreeMap<String, ScanJob>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a record, as if persisted by an earlier run
    pub fn with_jobs(jobs: Vec<ScanJob>) -> Self {
        let map = jobs.into_iter().map(|j| (j.id.clone(), j)).collect();
        Self { jobs: Mutex::new(map) }
    }
}

impl JobStore for MemoryJobStore {
    fn save(&self, job: &ScanJob) -> anyhow::Result<()> {
        self.jobs.lock().unwrap().insert(job.id.clone(), job.clone());
        Ok(())
    }

    fn load_all(&self) -> anyhow::Result<Vec<ScanJob>> {
        Ok(self.jobs.lock().unwrap().values().cloned().collect())
    }
}

/// In-memory result store
#[derive(Default)]
pub struct MemoryResultStore {
    results: Mutex<BTreeMap<String, ScanResult>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResultStore for MemoryResultStore {
    fn save(&self, result: &ScanResult) -> anyhow::Result<()> {
        self.results.lock().unwrap().insert(result.job_id.clone(), result.clone());
        Ok(())
    }

    fn load(&self, job_id: &str) -> anyhow::Result<Option<ScanResult>> {
        Ok(self.results.lock().unwrap().get(job_id).cloned())
    }

    fn for_repository(&self, repository: &str) -> anyhow::Result<Vec<ScanResult>> {
        let mut results: Vec<ScanResult> = self
            .results
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.repository.eq_ignore_ascii_case(repository))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));
        Ok(results)
    }

    fn load_all(&self) -> anyhow::Result<Vec<ScanResult>> {
        Ok(self.results.lock().unwrap().values().cloned().collect())
    }
}

/// Scanner mock: returns a prepared report path, or times out
pub struct MockScanner {
    pub report: PathBuf,
    pub timeout: bool,
}

impl MockScanner {
    pub fn returning(report: PathBuf) -> Self {
        Self { report, timeout: false }
    }

    pub fn timing_out() -> Self {
        Self { report: PathBuf::new(), timeout: true }
    }
}

impl Scanner for MockScanner {
    fn scan(&self, _job: &ScanJob, _snapshot: &Path) -> Result<PathBuf, ScanError> {
        if self.timeout {
            Err(ScanError::ScannerTimeout(1))
        } else {
            Ok(self.report.clone())
        }
    }
}

/// Forge mock: fixed license and snapshot, records every callback
pub struct MockForge {
    pub license: Option<String>,
    pub snapshot: PathBuf,
    pub statuses: Mutex<Vec<(String, CallbackStatus)>>,
}

impl MockForge {
    pub fn new(license: Option<&str>, snapshot: PathBuf) -> Self {
        Self {
            license: license.map(ToString::to_string),
            snapshot,
            statuses: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_statuses(&self, job_id: &str) -> Vec<CallbackStatus> {
        self.statuses
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == job_id)
            .map(|(_, s)| *s)
            .collect()
    }
}

impl ForgeClient for MockForge {
    fn repository_license(&self, _job: &ScanJob) -> Result<Option<String>, ScanError> {
        Ok(self.license.clone())
    }

    fn fetch_snapshot(&self, _job: &ScanJob) -> Result<PathBuf, ScanError> {
        Ok(self.snapshot.clone())
    }

    fn post_status(
        &self,
        job: &ScanJob,
        status: CallbackStatus,
        _has_issue: Option<bool>,
        _result_url: Option<&str>,
    ) -> anyhow::Result<()> {
        self.statuses.lock().unwrap().push((job.id.clone(), status));
        Ok(())
    }
}
