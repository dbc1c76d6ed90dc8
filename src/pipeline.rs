//! Scan pipeline orchestrator
//!
//! Runs a fixed pool of worker threads over the job queue. Each worker
//! repeatedly claims a job, drives it through license resolution,
//! snapshot fetch, scan, parse and classification, then records the
//! terminal state. Workers never crash the process over one bad job:
//! every failure path lands in a queue transition.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::classify;
use crate::forge::{CallbackStatus, ForgeClient};
use crate::models::ScanJob;
use crate::policy::PolicyStore;
use crate::queue::{JobQueue, QueueError};
use crate::report;
use crate::scanner::{ScanError, Scanner};
use crate::storage::ResultStore;

/// How long a worker parks on the queue before rechecking shutdown
const CLAIM_WAIT: Duration = Duration::from_millis(500);

/// Fixed-size worker pool driving jobs through the scan pipeline
pub struct Pipeline {
    queue: Arc<JobQueue>,
    scanner: Arc<dyn Scanner>,
    forge: Arc<dyn ForgeClient>,
    results: Arc<dyn ResultStore>,
    policy: Arc<PolicyStore>,
    workers: usize,
    result_url_base: Option<String>,
    shutdown: Arc<AtomicBool>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").field("workers", &self.workers).finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Assemble a pipeline over its collaborators
    #[must_use]
    pub fn new(
        queue: Arc<JobQueue>,
        scanner: Arc<dyn Scanner>,
        forge: Arc<dyn ForgeClient>,
        results: Arc<dyn ResultStore>,
        policy: Arc<PolicyStore>,
        workers: usize,
        result_url_base: Option<String>,
    ) -> Self {
        Self {
            queue,
            scanner,
            forge,
            results,
            policy,
            workers: workers.max(1),
            result_url_base,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn the worker threads and return their handles
    #[must_use]
    pub fn start(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        log::info!("Starting {} scan workers", self.workers);
        (0..self.workers)
            .map(|n| {
                let pipeline = Arc::clone(self);
                std::thread::Builder::new()
                    .name(format!("scan-worker-{n}"))
                    .spawn(move || pipeline.worker_loop())
                    .unwrap_or_else(|e| panic!("failed to spawn worker thread: {e}"))
            })
            .collect()
    }

    /// Signal all workers to drain and exit
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.queue.notify_all();
    }

    fn worker_loop(&self) {
        while !self.shutdown.load(Ordering::SeqCst) {
            match self.queue.claim_next_timeout(CLAIM_WAIT) {
                Ok(job) => self.process_one(job),
                Err(QueueError::Empty) => {},
                Err(e) => {
                    log::error!("Queue claim failed: {e}");
                    std::thread::sleep(CLAIM_WAIT);
                },
            }
        }
        log::debug!("Worker {:?} exiting", std::thread::current().name());
    }

    /// Run one claimed job to a terminal queue transition.
    ///
    /// Retryable scan errors go back through the queue; a malformed
    /// report fails the job immediately since rescanning the same
    /// snapshot cannot fix it.
    pub fn process_one(&self, mut job: ScanJob) {
        log::info!(
            "Processing {} ({} attempt {}): {}@{}",
            job.id,
            job.action,
            job.attempts,
            job.pull_request_url,
            job.head_commit_sha
        );
        self.notify(&job, CallbackStatus::Scanning, None, None);

        match self.run_scan(&mut job) {
            Ok(has_issue) => {
                if let Err(e) = self.queue.mark_succeeded(&job.id) {
                    log::error!("Could not record success for {}: {e}", job.id);
                    return;
                }
                let status = if has_issue {
                    CallbackStatus::IssuesDetected
                } else {
                    CallbackStatus::Completed
                };
                let result_url = self.result_url(&job.id);
                self.notify(&job, status, Some(has_issue), result_url.as_deref());
            },
            Err(e) if e.is_retryable() => match self.queue.requeue_if_retryable(&job.id, &e.to_string()) {
                Ok(true) => {},
                Ok(false) => {
                    self.notify(&job, CallbackStatus::CannotBeScanned, None, None);
                },
                Err(qe) => log::error!("Could not requeue {}: {qe}", job.id),
            },
            Err(e) => {
                if let Err(qe) = self.queue.mark_failed(&job.id, &e.to_string()) {
                    log::error!("Could not record failure for {}: {qe}", job.id);
                }
                self.notify(&job, CallbackStatus::CannotBeScanned, None, None);
            },
        }
    }

    fn run_scan(&self, job: &mut ScanJob) -> Result<bool, ScanError> {
        job.repository_license = self.forge.repository_license(job)?;
        if let Some(license) = &job.repository_license {
            log::debug!("{} repository license: {license}", job.id);
        }

        let snapshot = self.forge.fetch_snapshot(job)?;
        let report_path = self.scanner.scan(job, &snapshot)?;
        let content = std::fs::read_to_string(&report_path).map_err(|e| {
            ScanError::ScannerUnavailable(format!(
                "cannot read report {}: {e}",
                report_path.display()
            ))
        })?;

        let matches = report::parse_report(&content)?;
        let verdicts =
            classify::classify(job.repository_license.as_deref(), &matches, &self.policy);
        let result = classify::build_result(job, verdicts);
        let has_issue = result.has_issue;

        self.results
            .save(&result)
            .map_err(|e| ScanError::ScannerUnavailable(format!("cannot persist result: {e}")))?;
        log::info!(
            "{} scanned: {} matches, {} verdicts, has_issue={has_issue}",
            job.id,
            matches.len(),
            result.verdicts.len()
        );
        Ok(has_issue)
    }

    fn notify(
        &self,
        job: &ScanJob,
        status: CallbackStatus,
        has_issue: Option<bool>,
        result_url: Option<&str>,
    ) {
        if let Err(e) = self.forge.post_status(job, status, has_issue, result_url) {
            log::warn!("Status callback {status} for {} failed: {e}", job.id);
        }
    }

    fn result_url(&self, job_id: &str) -> Option<String> {
        self.result_url_base
            .as_ref()
            .map(|base| format!("{}/api/v1/results/{job_id}", base.trim_end_matches('/')))
    }
}
