//! Durable job queue
//!
//! Holds every scan job ever enqueued (append-only audit trail) and
//! owns all job mutation. The state machine is
//! `pending -> processing -> {succeeded | pending (retry) | failed}`;
//! terminal states have no outgoing transitions.
//!
//! Claiming is atomic across workers: the queue mutex makes
//! `claim_next` a single critical section, and a (pull request, SHA)
//! pair with a job already processing is not eligible, so two workers
//! can never run the same scan concurrently.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use crate::models::{JobStatus, ScanJob, WebhookEvent};
use crate::storage::JobStore;

/// Queue operation errors
#[derive(Debug, Error)]
pub enum QueueError {
    /// No eligible pending job
    #[error("no pending job in the queue")]
    Empty,
    /// Unknown job id
    #[error("job not found: {0}")]
    NotFound(String),
    /// Transition not allowed from the job's current state
    #[error("invalid transition for {id}: {from} -> {to}")]
    InvalidTransition {
        /// Job id
        id: String,
        /// Current state
        from: JobStatus,
        /// Requested state
        to: JobStatus,
    },
    /// Persistence failure
    #[error("job storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

struct QueueState {
    jobs: Vec<ScanJob>,
    next_id: u64,
}

/// Durable, mutex-guarded scan job queue
pub struct JobQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    store: Box<dyn JobStore>,
    max_attempts: u32,
}

impl std::fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobQueue").field("max_attempts", &self.max_attempts).finish_non_exhaustive()
    }
}

impl JobQueue {
    /// Open the queue over a store, reloading persisted jobs.
    ///
    /// Jobs left in `processing` by a crashed worker are demoted back
    /// to `pending` so the scan is retried after a restart.
    pub fn open(store: Box<dyn JobStore>, max_attempts: u32) -> Result<Self, QueueError> {
        let mut jobs = store.load_all()?;
        let mut next_id = 1;
        for job in &mut jobs {
            if let Some(n) = job.id.strip_prefix("JOB-").and_then(|n| n.parse::<u64>().ok()) {
                next_id = next_id.max(n + 1);
            }
            if job.status == JobStatus::Processing {
                log::info!("Recovering interrupted job {}", job.id);
                job.status = JobStatus::Pending;
                store.save(job)?;
            }
        }
        Ok(Self {
            state: Mutex::new(QueueState { jobs, next_id }),
            available: Condvar::new(),
            store,
            max_attempts,
        })
    }

    /// Enqueue a webhook event, returning the id of the job that now
    /// covers it.
    ///
    /// Duplicate handling for an existing non-terminal job with the
    /// same (pull request URL, SHA): superseding actions retire any
    /// pending duplicate and enqueue a fresh job; other actions are
    /// no-ops returning the existing job's id.
    pub fn enqueue(&self, event: &WebhookEvent) -> Result<String, QueueError> {
        let mut state = self.lock();

        let duplicate = state
            .jobs
            .iter()
            .position(|j| !j.status.is_terminal() && same_key(j, event));

        if let Some(idx) = duplicate {
            if !event.action.is_superseding() {
                return Ok(state.jobs[idx].id.clone());
            }
            // Retire pending duplicates; a processing one is left to
            // finish and simply loses the race to the new job.
            for job in &mut state.jobs {
                if job.status == JobStatus::Pending && same_key(job, event) {
                    job.status = JobStatus::Failed;
                    job.fail_reason = Some("superseded".to_string());
                    self.store.save(job)?;
                    log::debug!("Job {} superseded by new {} event", job.id, event.action);
                }
            }
        }

        let id = format!("JOB-{}", state.next_id);
        state.next_id += 1;
        let job = ScanJob::from_event(id.clone(), event, Utc::now().to_rfc3339());
        self.store.save(&job)?;
        log::info!("Enqueued {} for {}@{}", id, event.pull_request_url, event.head_commit_sha);
        state.jobs.push(job);
        drop(state);
        self.available.notify_one();
        Ok(id)
    }

    /// Atomically claim one pending job: transition it to processing,
    /// increment its attempt counter, and return a copy.
    pub fn claim_next(&self) -> Result<ScanJob, QueueError> {
        let mut state = self.lock();
        let processing_keys: Vec<(String, String)> = state
            .jobs
            .iter()
            .filter(|j| j.status == JobStatus::Processing)
            .map(|j| (j.pull_request_url.clone(), j.head_commit_sha.clone()))
            .collect();

        let idx = state
            .jobs
            .iter()
            .position(|j| {
                j.status == JobStatus::Pending
                    && !processing_keys
                        .iter()
                        .any(|(url, sha)| url == &j.pull_request_url && sha == &j.head_commit_sha)
            })
            .ok_or(QueueError::Empty)?;

        let job = &mut state.jobs[idx];
        job.status = JobStatus::Processing;
        job.attempts += 1;
        self.store.save(job)?;
        Ok(job.clone())
    }

    /// Like [`claim_next`](Self::claim_next), but parks on the queue
    /// condvar for up to `timeout` when nothing is eligible.
    pub fn claim_next_timeout(&self, timeout: Duration) -> Result<ScanJob, QueueError> {
        match self.claim_next() {
            Err(QueueError::Empty) => {},
            other => return other,
        }
        // One wakeup per wait is enough; the worker loop retries.
        let guard = self.lock();
        let (guard, _timed_out) = self
            .available
            .wait_timeout(guard, timeout)
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        drop(guard);
        self.claim_next()
    }

    /// Terminal success transition. Idempotent when the job already
    /// succeeded; invalid from any other non-processing state.
    pub fn mark_succeeded(&self, id: &str) -> Result<(), QueueError> {
        self.terminal_transition(id, JobStatus::Succeeded, None)
    }

    /// Terminal failure transition with a reason. Idempotent when the
    /// job already failed; invalid from any other non-processing state.
    pub fn mark_failed(&self, id: &str, reason: &str) -> Result<(), QueueError> {
        self.terminal_transition(id, JobStatus::Failed, Some(reason.to_string()))
    }

    fn terminal_transition(
        &self,
        id: &str,
        to: JobStatus,
        reason: Option<String>,
    ) -> Result<(), QueueError> {
        let mut state = self.lock();
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| QueueError::NotFound(id.to_string()))?;

        if job.status == to {
            return Ok(());
        }
        if job.status != JobStatus::Processing {
            return Err(QueueError::InvalidTransition {
                id: id.to_string(),
                from: job.status,
                to,
            });
        }
        job.status = to;
        if reason.is_some() {
            job.fail_reason = reason;
        }
        self.store.save(job)?;
        log::info!("Job {id} -> {to}");
        Ok(())
    }

    /// Handle a transient failure: requeue while attempts remain,
    /// otherwise fail terminally. Returns true when the job was
    /// requeued.
    pub fn requeue_if_retryable(&self, id: &str, reason: &str) -> Result<bool, QueueError> {
        let mut state = self.lock();
        let max_attempts = self.max_attempts;
        let job = state
            .jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| QueueError::NotFound(id.to_string()))?;

        if job.status != JobStatus::Processing {
            return Err(QueueError::InvalidTransition {
                id: id.to_string(),
                from: job.status,
                to: JobStatus::Pending,
            });
        }

        job.fail_reason = Some(reason.to_string());
        let requeued = job.attempts < max_attempts;
        if requeued {
            job.status = JobStatus::Pending;
            log::warn!("Job {id} attempt {}/{max_attempts} failed, requeued: {reason}", job.attempts);
        } else {
            job.status = JobStatus::Failed;
            log::error!("Job {id} exhausted {max_attempts} attempts: {reason}");
        }
        self.store.save(job)?;
        drop(state);
        if requeued {
            self.available.notify_one();
        }
        Ok(requeued)
    }

    /// Look up one job by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<ScanJob> {
        self.lock().jobs.iter().find(|j| j.id == id).cloned()
    }

    /// Number of jobs currently pending
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.lock().jobs.iter().filter(|j| j.status == JobStatus::Pending).count()
    }

    /// Total number of jobs ever recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().jobs.len()
    }

    /// Whether the queue holds no jobs at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().jobs.is_empty()
    }

    /// Wake all workers parked on the queue (used at shutdown)
    pub fn notify_all(&self) {
        self.available.notify_all();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn same_key(job: &ScanJob, event: &WebhookEvent) -> bool {
    job.pull_request_url == event.pull_request_url
        && job.head_commit_sha == event.head_commit_sha
}
