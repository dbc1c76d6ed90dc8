//! Scan job model
//!
//! A scan job represents one queued compliance check for a pull request,
//! keyed by (pull-request URL, head commit SHA). Jobs are created from
//! webhook events and mutated only by the job queue.

use serde::{Deserialize, Serialize};

/// Action carried by the pull-request webhook event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestAction {
    /// Pull request opened
    Opened,
    /// Pull request reopened
    Reopened,
    /// New commits pushed to the pull request
    Synchronize,
    /// Pull request closed
    Closed,
    /// Explicit re-scan request (manual trigger)
    Rescan,
}

impl PullRequestAction {
    /// Whether this action should lead to a scan at all
    #[must_use]
    pub const fn is_relevant(self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Whether this action supersedes an earlier job for the same
    /// (pull request, commit) pair
    #[must_use]
    pub const fn is_superseding(self) -> bool {
        matches!(self, Self::Synchronize | Self::Rescan)
    }
}

impl std::fmt::Display for PullRequestAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opened => write!(f, "opened"),
            Self::Reopened => write!(f, "reopened"),
            Self::Synchronize => write!(f, "synchronize"),
            Self::Closed => write!(f, "closed"),
            Self::Rescan => write!(f, "rescan"),
        }
    }
}

impl std::str::FromStr for PullRequestAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opened" => Ok(Self::Opened),
            "reopened" => Ok(Self::Reopened),
            "synchronize" => Ok(Self::Synchronize),
            "closed" => Ok(Self::Closed),
            "rescan" => Ok(Self::Rescan),
            _ => Err(format!("Unknown pull request action: {s}")),
        }
    }
}

/// Job lifecycle status
///
/// `pending -> processing -> {succeeded | pending (retry) | failed}`.
/// `Succeeded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting to be claimed by a worker
    #[default]
    Pending,
    /// Claimed by a worker, scan in flight
    Processing,
    /// Scan finished and result persisted
    Succeeded,
    /// Terminal failure (permanent error or retries exhausted)
    Failed,
}

impl JobStatus {
    /// Whether this state has no outgoing transitions
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Inbound webhook event, normalized from the forge payload
///
/// This is the queue's enqueue input; the HTTP layer maps the raw
/// payload onto it 1:1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Action that triggered the event
    pub action: PullRequestAction,
    /// Pull request HTML URL (identity, together with the commit SHA)
    pub pull_request_url: String,
    /// URL the diff/files are fetched from
    pub pull_request_files_url: String,
    /// Pull request API URL
    pub pull_request_api_url: String,
    /// Repository HTML URL
    pub repository_url: String,
    /// Head commit SHA
    pub head_commit_sha: String,
    /// Sender identity
    pub user: String,
    /// Review system type (e.g., "github")
    pub review_system: String,
    /// Optional status callback URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_callback_url: Option<String>,
}

/// One queued compliance check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanJob {
    /// Unique identifier (auto-generated: JOB-N)
    pub id: String,
    /// Action that created the job
    pub action: PullRequestAction,
    /// Number of times a worker has claimed this job
    pub attempts: u32,
    /// Current lifecycle state
    pub status: JobStatus,
    /// When the job was enqueued (RFC3339)
    pub scan_date: String,
    /// Sender identity from the webhook
    pub user: String,
    /// Review system type (e.g., "github")
    pub review_system: String,
    /// Repository HTML URL
    pub repository_url: String,
    /// Pull request HTML URL
    pub pull_request_url: String,
    /// URL the diff/files are fetched from
    pub pull_request_files_url: String,
    /// Pull request API URL
    pub pull_request_api_url: String,
    /// Head commit SHA
    pub head_commit_sha: String,
    /// Optional status callback URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_callback_url: Option<String>,
    /// Reason for the last failure or requeue, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_reason: Option<String>,
    /// Declared license of the repository, resolved lazily per attempt.
    /// Never persisted with the job.
    #[serde(skip)]
    pub repository_license: Option<String>,
}

impl ScanJob {
    /// Build a fresh pending job from a webhook event
    #[must_use]
    pub fn from_event(id: String, event: &WebhookEvent, scan_date: String) -> Self {
        Self {
            id,
            action: event.action,
            attempts: 0,
            status: JobStatus::Pending,
            scan_date,
            user: event.user.clone(),
            review_system: event.review_system.clone(),
            repository_url: event.repository_url.clone(),
            pull_request_url: event.pull_request_url.clone(),
            pull_request_files_url: event.pull_request_files_url.clone(),
            pull_request_api_url: event.pull_request_api_url.clone(),
            head_commit_sha: event.head_commit_sha.clone(),
            status_callback_url: event.status_callback_url.clone(),
            fail_reason: None,
            repository_license: None,
        }
    }

    /// Identity key: two jobs with the same key target the same scan
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.pull_request_url, &self.head_commit_sha)
    }

    /// Last URL segment of the repository URL
    #[must_use]
    pub fn repository_name(&self) -> &str {
        self.repository_url.rsplit('/').next().unwrap_or("unknown")
    }

    /// Second-to-last URL segment of the repository URL
    #[must_use]
    pub fn repository_organization(&self) -> &str {
        let mut segments = self.repository_url.rsplit('/');
        segments.next();
        segments.next().unwrap_or("unknown")
    }

    /// `org/name` slug used for history and dashboard grouping
    #[must_use]
    pub fn repository_slug(&self) -> String {
        format!("{}/{}", self.repository_organization(), self.repository_name())
    }

    /// Last URL segment of the pull request URL (the PR number)
    #[must_use]
    pub fn pull_request_number(&self) -> &str {
        self.pull_request_url.rsplit('/').next().unwrap_or("0")
    }
}
