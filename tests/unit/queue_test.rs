//! Job queue state machine and concurrency tests

use std::sync::Arc;

use prescan::models::{JobStatus, PullRequestAction};
use prescan::queue::{JobQueue, QueueError};
use prescan::storage::JobStore;

use crate::common::fixtures::event;
use crate::common::mocks::MemoryJobStore;

fn queue(max_attempts: u32) -> JobQueue {
    JobQueue::open(Box::new(MemoryJobStore::new()), max_attempts).unwrap()
}

#[test]
fn enqueue_assigns_sequential_ids() {
    let q = queue(4);
    let a = q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
    let b = q.enqueue(&event(PullRequestAction::Opened, 2, "bbb")).unwrap();
    assert_eq!(a, "JOB-1");
    assert_eq!(b, "JOB-2");
    assert_eq!(q.pending_count(), 2);
}

#[test]
fn duplicate_event_returns_existing_job() {
    let q = queue(4);
    let first = q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
    let second = q.enqueue(&event(PullRequestAction::Reopened, 1, "aaa")).unwrap();
    assert_eq!(first, second);
    assert_eq!(q.len(), 1);
}

#[test]
fn superseding_event_retires_pending_duplicate() {
    let q = queue(4);
    let first = q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
    let second = q.enqueue(&event(PullRequestAction::Synchronize, 1, "aaa")).unwrap();
    assert_ne!(first, second);

    let old = q.get(&first).unwrap();
    assert_eq!(old.status, JobStatus::Failed);
    assert_eq!(old.fail_reason.as_deref(), Some("superseded"));
    assert_eq!(q.get(&second).unwrap().status, JobStatus::Pending);
}

#[test]
fn terminal_job_does_not_block_a_rescan() {
    let q = queue(4);
    let first = q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
    let claimed = q.claim_next().unwrap();
    assert_eq!(claimed.id, first);
    q.mark_succeeded(&first).unwrap();

    // Same key again after completion: a new job, not a duplicate
    let second = q.enqueue(&event(PullRequestAction::Rescan, 1, "aaa")).unwrap();
    assert_ne!(first, second);
    assert_eq!(q.get(&second).unwrap().status, JobStatus::Pending);
}

#[test]
fn claim_increments_attempts_and_transitions() {
    let q = queue(4);
    q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
    let job = q.claim_next().unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.attempts, 1);
    assert!(matches!(q.claim_next(), Err(QueueError::Empty)));
}

#[test]
fn claim_skips_keys_already_processing() {
    let q = queue(4);
    q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
    let first = q.claim_next().unwrap();

    // A superseding event for the same key queues a new job, but it is
    // not claimable while the old one is still processing.
    q.enqueue(&event(PullRequestAction::Synchronize, 1, "aaa")).unwrap();
    assert!(matches!(q.claim_next(), Err(QueueError::Empty)));

    q.mark_failed(&first.id, "boom").unwrap();
    assert!(q.claim_next().is_ok());
}

#[test]
fn concurrent_claims_never_hand_out_the_same_job() {
    let q = Arc::new(queue(4));
    for n in 0..8 {
        q.enqueue(&event(PullRequestAction::Opened, n, &format!("sha{n}"))).unwrap();
    }

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let q = Arc::clone(&q);
            std::thread::spawn(move || q.claim_next().map(|j| j.id))
        })
        .collect();

    let mut ids: Vec<String> =
        handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8, "every claim must return a distinct job");
}

#[test]
fn mark_succeeded_is_idempotent() {
    let q = queue(4);
    let id = q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
    q.claim_next().unwrap();
    q.mark_succeeded(&id).unwrap();
    q.mark_succeeded(&id).unwrap();
    assert_eq!(q.get(&id).unwrap().status, JobStatus::Succeeded);
}

#[test]
fn terminal_transition_requires_processing() {
    let q = queue(4);
    let id = q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
    let err = q.mark_succeeded(&id).unwrap_err();
    assert!(matches!(err, QueueError::InvalidTransition { .. }));

    let err = q.mark_succeeded("JOB-999").unwrap_err();
    assert!(matches!(err, QueueError::NotFound(_)));
}

#[test]
fn retry_requeues_until_attempts_exhausted() {
    let q = queue(2);
    let id = q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();

    q.claim_next().unwrap();
    assert!(q.requeue_if_retryable(&id, "scanner timeout").unwrap());
    assert_eq!(q.get(&id).unwrap().status, JobStatus::Pending);

    q.claim_next().unwrap();
    assert!(!q.requeue_if_retryable(&id, "scanner timeout").unwrap());
    let job = q.get(&id).unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.attempts, 2);
    assert_eq!(job.fail_reason.as_deref(), Some("scanner timeout"));
}

#[test]
fn restart_demotes_processing_jobs() {
    let store = MemoryJobStore::new();
    {
        let q = JobQueue::open(Box::new(MemoryJobStore::new()), 4).unwrap();
        q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();
        let job = q.claim_next().unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        store.save(&job).unwrap();
    }

    // Reopen over the persisted state, as after a crash
    let reopened = JobQueue::open(Box::new(store), 4).unwrap();
    let job = reopened.get("JOB-1").unwrap();
    assert_eq!(job.status, JobStatus::Pending);
    assert_eq!(job.attempts, 1, "attempt count survives the restart");

    // Id allocation continues after the recovered job
    let next = reopened.enqueue(&event(PullRequestAction::Opened, 2, "bbb")).unwrap();
    assert_eq!(next, "JOB-2");
}

#[test]
fn claim_next_timeout_returns_empty_when_idle() {
    let q = queue(4);
    let result = q.claim_next_timeout(std::time::Duration::from_millis(50));
    assert!(matches!(result, Err(QueueError::Empty)));
}

#[test]
fn claim_next_timeout_wakes_on_enqueue() {
    let q = Arc::new(queue(4));
    let waiter = {
        let q = Arc::clone(&q);
        std::thread::spawn(move || q.claim_next_timeout(std::time::Duration::from_secs(5)))
    };
    std::thread::sleep(std::time::Duration::from_millis(20));
    q.enqueue(&event(PullRequestAction::Opened, 1, "aaa")).unwrap();

    let job = waiter.join().unwrap().unwrap();
    assert_eq!(job.id, "JOB-1");
}
