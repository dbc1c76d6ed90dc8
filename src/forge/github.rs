//! GitHub forge client
//!
//! Resolves the repository license from the repos API, downloads the
//! pull-request diff and materializes its added lines as a scannable
//! snapshot, and posts status callbacks. All calls are blocking; the
//! worker threads own the latency.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};

use crate::config::Config;
use crate::models::ScanJob;
use crate::paths;
use crate::scanner::ScanError;

use super::{CallbackStatus, ForgeClient};

const DIFF_MEDIA_TYPE: &str = "application/vnd.github.diff";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub implementation of the forge port
pub struct GithubClient {
    http: Client,
    api_base: String,
    token: Option<String>,
    snapshots_dir: PathBuf,
}

impl std::fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubClient").field("api_base", &self.api_base).finish_non_exhaustive()
    }
}

impl GithubClient {
    /// Build a client from the service config and state directory
    pub fn new(config: &Config, state_dir: &std::path::Path) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_base: config.github_api_url.trim_end_matches('/').to_string(),
            token: config.github_token.clone(),
            snapshots_dir: paths::snapshots_dir(state_dir),
        })
    }

    fn get(&self, url: &str, accept: &str) -> reqwest::blocking::RequestBuilder {
        let mut req = self
            .http
            .get(url)
            .header(USER_AGENT, concat!("prescan/", env!("CARGO_PKG_VERSION")))
            .header(ACCEPT, accept.to_string());
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        req
    }
}

impl ForgeClient for GithubClient {
    fn repository_license(&self, job: &ScanJob) -> Result<Option<String>, ScanError> {
        let url = format!(
            "{}/repos/{}/{}",
            self.api_base,
            job.repository_organization(),
            job.repository_name()
        );
        let response = self
            .get(&url, "application/vnd.github+json")
            .send()
            .map_err(|e| ScanError::LicenseResolution(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(ScanError::LicenseResolution(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        let body: serde_json::Value =
            response.json().map_err(|e| ScanError::LicenseResolution(e.to_string()))?;
        let spdx = body
            .pointer("/license/spdx_id")
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty() && *s != "NOASSERTION")
            .map(ToString::to_string);
        Ok(spdx)
    }

    fn fetch_snapshot(&self, job: &ScanJob) -> Result<PathBuf, ScanError> {
        let dir =
            paths::snapshot_dir(&self.snapshots_dir, job.repository_name(), &job.head_commit_sha);
        if dir.join(".complete").exists() {
            log::debug!("Reusing snapshot {}", dir.display());
            return Ok(dir);
        }

        let response = self
            .get(&job.pull_request_api_url, DIFF_MEDIA_TYPE)
            .send()
            .map_err(|e| ScanError::SnapshotUnavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ScanError::SnapshotUnavailable(format!(
                "diff download returned {}",
                response.status()
            )));
        }
        let diff = response.text().map_err(|e| ScanError::SnapshotUnavailable(e.to_string()))?;

        materialize_diff(&diff, &dir)
            .map_err(|e| ScanError::SnapshotUnavailable(e.to_string()))?;
        std::fs::write(dir.join(".complete"), "")
            .map_err(|e| ScanError::SnapshotUnavailable(e.to_string()))?;
        Ok(dir)
    }

    fn post_status(
        &self,
        job: &ScanJob,
        status: CallbackStatus,
        has_issue: Option<bool>,
        result_url: Option<&str>,
    ) -> anyhow::Result<()> {
        let Some(callback_url) = &job.status_callback_url else {
            log::debug!("Job {} has no status callback URL, skipping {status}", job.id);
            return Ok(());
        };
        let body = serde_json::json!({
            "job_id": job.id,
            "pull_request_url": job.pull_request_url,
            "commit_sha": job.head_commit_sha,
            "status": status.as_str(),
            "has_issue": has_issue,
            "result_url": result_url,
        });
        let response = self
            .http
            .post(callback_url)
            .header(USER_AGENT, concat!("prescan/", env!("CARGO_PKG_VERSION")))
            .json(&body)
            .send()?;
        if !response.status().is_success() {
            anyhow::bail!("status callback returned {}", response.status());
        }
        Ok(())
    }
}

/// Write the added lines of a unified diff as files under `dir`.
///
/// The scanner only needs the new content of changed files, so removed
/// lines and context markers are dropped. Enough fidelity for snippet
/// matching; full checkouts stay out of scope.
fn materialize_diff(diff: &str, dir: &std::path::Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut current: Option<(PathBuf, String)> = None;
    for line in diff.lines() {
        if let Some(rest) = line.strip_prefix("+++ b/") {
            if let Some((path, content)) = current.take() {
                write_snapshot_file(dir, &path, &content)?;
            }
            current = Some((PathBuf::from(rest.trim()), String::new()));
        } else if line.starts_with("+++") {
            // "+++ /dev/null" - file deleted, nothing to scan
            if let Some((path, content)) = current.take() {
                write_snapshot_file(dir, &path, &content)?;
            }
        } else if let Some((_, content)) = current.as_mut()
            && let Some(added) = line.strip_prefix('+')
        {
            content.push_str(added);
            content.push('\n');
        }
    }
    if let Some((path, content)) = current {
        write_snapshot_file(dir, &path, &content)?;
    }
    Ok(())
}

fn write_snapshot_file(
    dir: &std::path::Path,
    rel: &std::path::Path,
    content: &str,
) -> anyhow::Result<()> {
    // Reject traversal out of the snapshot root
    if rel.components().any(|c| matches!(c, std::path::Component::ParentDir)) {
        anyhow::bail!("diff path escapes snapshot root: {}", rel.display());
    }
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
