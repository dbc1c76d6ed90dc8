//! Scan output models
//!
//! A parsed scanner report becomes a list of `LicenseMatch` records,
//! the classifier turns each into exactly one `LicenseVerdict`, and the
//! per-job aggregate is a `ScanResult`. All immutable after creation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One detected license occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseMatch {
    /// Path of the file the match was found in
    pub file_path: String,
    /// Matched license identifier (SPDX or raw scanner string)
    pub license: String,
    /// Matched line range, as reported by the scanner (e.g., "11-24")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_lines: Option<String>,
    /// Similarity indicator, as reported by the scanner (e.g., "95%")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_percent: Option<String>,
    /// Upstream component the snippet was matched against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Upstream component URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_url: Option<String>,
}

/// Classification outcome for a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    /// License is compatible with the repository license
    Permitted,
    /// License is forbidden or conflicts with the repository license
    Conflicting,
    /// License is unknown to the policy store
    Unreviewed,
}

impl std::fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permitted => write!(f, "permitted"),
            Self::Conflicting => write!(f, "conflicting"),
            Self::Unreviewed => write!(f, "unreviewed"),
        }
    }
}

/// The conflict rule that produced a `Conflicting` verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRule {
    /// Detected license side of the pair
    pub left: String,
    /// The license it conflicts with (usually the repository license)
    pub right: String,
}

impl std::fmt::Display for ConflictRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}", self.left, self.right)
    }
}

/// Classification of one license match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseVerdict {
    /// The match this verdict classifies
    pub matched: LicenseMatch,
    /// Resulting status
    pub status: VerdictStatus,
    /// The conflict rule that fired, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<ConflictRule>,
}

/// Aggregate result for one completed job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Job this result belongs to
    pub job_id: String,
    /// Pull request HTML URL
    pub pull_request_url: String,
    /// Head commit SHA
    pub head_commit_sha: String,
    /// `org/name` repository slug
    pub repository: String,
    /// Ordered verdicts, one per match
    pub verdicts: Vec<LicenseVerdict>,
    /// Occurrence count per detected license id
    pub license_counts: BTreeMap<String, usize>,
    /// True iff at least one verdict is conflicting
    pub has_issue: bool,
    /// When the scan finished (RFC3339)
    pub finished_at: String,
}
