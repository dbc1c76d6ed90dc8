//! HTTP-agnostic request handlers
//!
//! Each handler takes the shared state plus typed input and returns
//! `Result<T, ApiError>`; the server adapter does nothing but decode,
//! dispatch and encode.

use std::str::FromStr;
use std::sync::Arc;

use crate::models::{LicensePolicy, PullRequestAction, ScanResult, WebhookEvent};
use crate::policy::PolicyStore;
use crate::queue::JobQueue;
use crate::storage::ResultStore;

use super::error::ApiError;
use super::types::{
    DashboardData, HistoryData, HistoryEntry, JobView, RepositoryStats, WebhookAccepted,
    WebhookPayload,
};

/// Shared state for all API handlers
pub struct AppState {
    /// The scan job queue
    pub queue: Arc<JobQueue>,
    /// Completed scan results
    pub results: Arc<dyn ResultStore>,
    /// License policy in force
    pub policy: Arc<PolicyStore>,
    /// History endpoint page size
    pub page_size: usize,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").field("page_size", &self.page_size).finish_non_exhaustive()
    }
}

/// Handle an inbound pull-request webhook.
///
/// Ping events and irrelevant actions are acknowledged without
/// queueing; everything else maps 1:1 onto a [`WebhookEvent`] and goes
/// through the queue's duplicate handling.
pub fn receive_webhook(
    state: &AppState,
    payload: &WebhookPayload,
) -> Result<WebhookAccepted, ApiError> {
    if payload.zen.is_some() {
        log::debug!("Webhook ping acknowledged");
        return Ok(WebhookAccepted { job_id: None, queued: false });
    }

    let action_str = payload
        .action
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Webhook payload has no action"))?;
    let action = PullRequestAction::from_str(action_str).map_err(ApiError::bad_request)?;

    let pull_request = payload
        .pull_request
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("Webhook payload has no pull_request"))?;
    let repository = payload
        .repository
        .as_ref()
        .ok_or_else(|| ApiError::bad_request("Webhook payload has no repository"))?;

    if !action.is_relevant() {
        log::debug!("Ignoring {action} event for {}", pull_request.html_url);
        return Ok(WebhookAccepted { job_id: None, queued: false });
    }

    // Fork PRs carry their changes in the head repository
    let files_url = match &pull_request.head.repo {
        Some(repo) if repo.fork => repo.html_url.clone(),
        _ => pull_request.html_url.clone(),
    };

    let event = WebhookEvent {
        action,
        pull_request_url: pull_request.html_url.clone(),
        pull_request_files_url: files_url,
        pull_request_api_url: pull_request.url.clone(),
        repository_url: repository.html_url.clone(),
        head_commit_sha: pull_request.head.sha.clone(),
        user: payload.sender.as_ref().map_or_else(|| "unknown".to_string(), |s| s.login.clone()),
        review_system: "github".to_string(),
        status_callback_url: payload.status_callback_url.clone(),
    };

    let job_id = state.queue.enqueue(&event).map_err(ApiError::from)?;
    Ok(WebhookAccepted { job_id: Some(job_id), queued: true })
}

/// Look up one job by id
pub fn get_job(state: &AppState, id: &str) -> Result<JobView, ApiError> {
    state
        .queue
        .get(id)
        .map(|job| JobView::from(&job))
        .ok_or_else(|| ApiError::not_found(format!("No job with id {id}")))
}

/// Look up the scan result for one job
pub fn get_result(state: &AppState, job_id: &str) -> Result<ScanResult, ApiError> {
    state
        .results
        .load(job_id)
        .map_err(|e| ApiError::internal(format!("Could not load result: {e}")))?
        .ok_or_else(|| ApiError::not_found(format!("No result for job {job_id}")))
}

/// One page of a repository's scan history, newest first
pub fn get_history(
    state: &AppState,
    owner: &str,
    name: &str,
    page: usize,
) -> Result<HistoryData, ApiError> {
    let repository = format!("{owner}/{name}");
    let all = state
        .results
        .for_repository(&repository)
        .map_err(|e| ApiError::internal(format!("Could not load history: {e}")))?;

    let page = page.max(1);
    let total = all.len();
    let entries = all
        .into_iter()
        .skip((page - 1) * state.page_size)
        .take(state.page_size)
        .map(|r| HistoryEntry {
            job_id: r.job_id,
            pull_request_url: r.pull_request_url,
            head_commit_sha: r.head_commit_sha,
            has_issue: r.has_issue,
            finished_at: r.finished_at,
        })
        .collect();

    Ok(HistoryData {
        repository,
        page,
        page_size: state.page_size,
        total,
        entries,
    })
}

/// Aggregate dashboard across every scanned repository
pub fn get_dashboard(state: &AppState) -> Result<DashboardData, ApiError> {
    let results = state
        .results
        .load_all()
        .map_err(|e| ApiError::internal(format!("Could not load results: {e}")))?;

    let mut by_repo: std::collections::BTreeMap<String, RepositoryStats> =
        std::collections::BTreeMap::new();
    for result in results {
        let stats = by_repo.entry(result.repository.clone()).or_insert_with(|| RepositoryStats {
            repository: result.repository.clone(),
            scans: 0,
            with_issues: 0,
            last_scan: String::new(),
            license_counts: std::collections::BTreeMap::new(),
        });
        stats.scans += 1;
        if result.has_issue {
            stats.with_issues += 1;
        }
        if result.finished_at > stats.last_scan {
            stats.last_scan = result.finished_at.clone();
        }
        for (license, count) in &result.license_counts {
            *stats.license_counts.entry(license.clone()).or_insert(0) += count;
        }
    }

    Ok(DashboardData {
        pending_jobs: state.queue.pending_count(),
        total_jobs: state.queue.len(),
        repositories: by_repo.into_values().collect(),
    })
}

/// Aggregate statistics for one repository
pub fn get_repository_dashboard(
    state: &AppState,
    owner: &str,
    name: &str,
) -> Result<RepositoryStats, ApiError> {
    let repository = format!("{owner}/{name}");
    let dashboard = get_dashboard(state)?;
    dashboard
        .repositories
        .into_iter()
        .find(|r| r.repository.eq_ignore_ascii_case(&repository))
        .ok_or_else(|| ApiError::not_found(format!("No scans recorded for {repository}")))
}

/// The license policy currently in force
pub fn list_licenses(state: &AppState) -> Result<Vec<LicensePolicy>, ApiError> {
    Ok(state.policy.iter().cloned().collect())
}

/// One policy entry by SPDX id or alternative name
pub fn get_license(state: &AppState, id: &str) -> Result<LicensePolicy, ApiError> {
    state
        .policy
        .find(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found(format!("No license '{id}' in the policy")))
}
