//! API request and response types
//!
//! All types are framework-agnostic and can be used by any client.
//! The webhook payload types mirror the forge's JSON shape; everything
//! the service does not read is simply not declared.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ApiErrorData;
use crate::models::{JobStatus, PullRequestAction, ScanJob};

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Standard API response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorData>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    #[must_use]
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorData {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

// =============================================================================
// WEBHOOK PAYLOAD
// =============================================================================

/// Raw pull-request webhook payload as delivered by the forge
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    /// Event action string
    #[serde(default)]
    pub action: Option<String>,
    /// Present only on the forge's ping event
    #[serde(default)]
    pub zen: Option<String>,
    /// Pull request details
    #[serde(default)]
    pub pull_request: Option<PullRequestInfo>,
    /// Repository details
    #[serde(default)]
    pub repository: Option<RepositoryInfo>,
    /// Event sender
    #[serde(default)]
    pub sender: Option<SenderInfo>,
    /// Optional URL to post status callbacks to
    #[serde(default)]
    pub status_callback_url: Option<String>,
}

/// Pull request section of the webhook payload
#[derive(Debug, Deserialize)]
pub struct PullRequestInfo {
    /// Human-facing pull request URL
    pub html_url: String,
    /// API URL of the pull request
    pub url: String,
    /// Head commit details
    pub head: HeadInfo,
}

/// Head section of the pull request payload
#[derive(Debug, Deserialize)]
pub struct HeadInfo {
    /// Head commit SHA
    pub sha: String,
    /// Repository the head branch lives in
    #[serde(default)]
    pub repo: Option<HeadRepoInfo>,
}

/// Head repository details
#[derive(Debug, Deserialize)]
pub struct HeadRepoInfo {
    /// Whether the head repository is a fork of the base
    #[serde(default)]
    pub fork: bool,
    /// Human-facing URL of the head repository
    pub html_url: String,
}

/// Repository section of the webhook payload
#[derive(Debug, Deserialize)]
pub struct RepositoryInfo {
    /// Human-facing repository URL
    pub html_url: String,
}

/// Sender section of the webhook payload
#[derive(Debug, Deserialize)]
pub struct SenderInfo {
    /// Sender login
    pub login: String,
}

// =============================================================================
// RESPONSE DATA
// =============================================================================

/// Webhook acknowledgement
#[derive(Debug, Serialize)]
pub struct WebhookAccepted {
    /// Id of the job covering this event, when one was queued
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Whether the event led to a queued scan
    pub queued: bool,
}

/// One job as seen through the query API
#[derive(Debug, Serialize)]
pub struct JobView {
    /// Job id
    pub id: String,
    /// Lifecycle state
    pub status: JobStatus,
    /// Action that created the job
    pub action: PullRequestAction,
    /// Claim attempts so far
    pub attempts: u32,
    /// `org/name` repository slug
    pub repository: String,
    /// Pull request URL
    pub pull_request_url: String,
    /// Head commit SHA
    pub head_commit_sha: String,
    /// Enqueue timestamp (RFC3339)
    pub scan_date: String,
    /// Last failure or requeue reason, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<String>,
}

impl From<&ScanJob> for JobView {
    fn from(job: &ScanJob) -> Self {
        Self {
            id: job.id.clone(),
            status: job.status,
            action: job.action,
            attempts: job.attempts,
            repository: job.repository_slug(),
            pull_request_url: job.pull_request_url.clone(),
            head_commit_sha: job.head_commit_sha.clone(),
            scan_date: job.scan_date.clone(),
            fail_reason: job.fail_reason.clone(),
        }
    }
}

/// One past scan in a repository's history
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    /// Job id the result belongs to
    pub job_id: String,
    /// Pull request URL
    pub pull_request_url: String,
    /// Head commit SHA
    pub head_commit_sha: String,
    /// Whether any conflicting license was found
    pub has_issue: bool,
    /// Scan finish timestamp (RFC3339)
    pub finished_at: String,
}

/// One page of a repository's scan history
#[derive(Debug, Serialize)]
pub struct HistoryData {
    /// `org/name` repository slug
    pub repository: String,
    /// Page number (1-based)
    pub page: usize,
    /// Page size
    pub page_size: usize,
    /// Total number of results for this repository
    pub total: usize,
    /// Results on this page, newest first
    pub entries: Vec<HistoryEntry>,
}

/// Aggregate statistics for one repository
#[derive(Debug, Serialize)]
pub struct RepositoryStats {
    /// `org/name` repository slug
    pub repository: String,
    /// Number of completed scans
    pub scans: usize,
    /// Number of scans that found at least one conflict
    pub with_issues: usize,
    /// Finish timestamp of the most recent scan
    pub last_scan: String,
    /// Detected licenses summed across all scans
    pub license_counts: BTreeMap<String, usize>,
}

/// Dashboard: per-repository aggregates plus queue depth
#[derive(Debug, Serialize)]
pub struct DashboardData {
    /// Jobs waiting to be claimed
    pub pending_jobs: usize,
    /// Jobs ever recorded
    pub total_jobs: usize,
    /// Per-repository statistics, sorted by slug
    pub repositories: Vec<RepositoryStats>,
}
