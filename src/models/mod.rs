//! Core value types
//!
//! Plain serde-backed data: scan jobs and their lifecycle, license
//! policy entries, and per-scan match/verdict/result aggregates.
//! None of these types perform I/O; mutation of jobs is the queue's
//! exclusive right.

pub mod job;
pub mod license;
pub mod scan;

pub use job::{JobStatus, PullRequestAction, ScanJob, WebhookEvent};
pub use license::{Access, LicensePolicy};
pub use scan::{ConflictRule, LicenseMatch, LicenseVerdict, ScanResult, VerdictStatus};
