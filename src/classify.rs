//! License classifier
//!
//! Pure business logic: given the repository's declared license, the
//! normalized matches, and a policy snapshot, produce exactly one
//! verdict per match and the aggregate issue flag. No I/O, no side
//! effects, deterministic for the same inputs.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::{
    Access, ConflictRule, LicenseMatch, LicenseVerdict, ScanJob, ScanResult, VerdictStatus,
};
use crate::policy::PolicyStore;

/// Classify every match against the policy store.
///
/// Rules, in order:
/// - license unknown to the store: `Unreviewed`
/// - license access is forbidden: `Conflicting` (no pair rule)
/// - license conflicts with the repository license: `Conflicting`,
///   with the rule that fired attached
/// - otherwise: `Permitted`
#[must_use]
pub fn classify(
    repository_license: Option<&str>,
    matches: &[LicenseMatch],
    policy: &PolicyStore,
) -> Vec<LicenseVerdict> {
    let repo_license = repository_license.map(|r| policy.normalize(r).to_string());

    matches
        .iter()
        .map(|m| {
            let (status, rule) = classify_one(&m.license, repo_license.as_deref(), policy);
            LicenseVerdict {
                matched: m.clone(),
                status,
                rule,
            }
        })
        .collect()
}

fn classify_one(
    license: &str,
    repo_license: Option<&str>,
    policy: &PolicyStore,
) -> (VerdictStatus, Option<ConflictRule>) {
    let Some(entry) = policy.find(license) else {
        // Fail-open: an unknown license is flagged for review, it does
        // not by itself raise the issue flag.
        return (VerdictStatus::Unreviewed, None);
    };
    if entry.access == Access::Forbidden {
        return (VerdictStatus::Conflicting, None);
    }
    if let Some(repo) = repo_license
        && let Some(rule) = policy.conflict_rule(&entry.spdx_id, repo)
    {
        return (VerdictStatus::Conflicting, Some(rule));
    }
    (VerdictStatus::Permitted, None)
}

/// Whether any verdict in the list is conflicting
#[must_use]
pub fn has_issue(verdicts: &[LicenseVerdict]) -> bool {
    verdicts.iter().any(|v| v.status == VerdictStatus::Conflicting)
}

/// Per-license occurrence counts over a verdict list
#[must_use]
pub fn license_counts(verdicts: &[LicenseVerdict]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for v in verdicts {
        *counts.entry(v.matched.license.clone()).or_insert(0) += 1;
    }
    counts
}

/// Assemble the immutable aggregate result for a completed job
#[must_use]
pub fn build_result(job: &ScanJob, verdicts: Vec<LicenseVerdict>) -> ScanResult {
    let issue = has_issue(&verdicts);
    let counts = license_counts(&verdicts);
    ScanResult {
        job_id: job.id.clone(),
        pull_request_url: job.pull_request_url.clone(),
        head_commit_sha: job.head_commit_sha.clone(),
        repository: job.repository_slug(),
        verdicts,
        license_counts: counts,
        has_issue: issue,
        finished_at: Utc::now().to_rfc3339(),
    }
}
