//! HTTP-agnostic API layer
//!
//! Typed request/response structures and pure handlers usable by any
//! HTTP server implementation or directly by tests.
//!
//! ## Design
//!
//! - **Handlers are pure functions**: take state plus typed input,
//!   return `Result<T, ApiError>`
//! - **Types are framework-agnostic**: no HTTP types leak in here
//! - **Errors carry HTTP semantics**: `ApiError` knows its status code

mod error;
mod handlers;
mod types;

pub use error::{ApiError, ApiErrorData, ErrorCode};
pub use handlers::{
    AppState, get_dashboard, get_history, get_job, get_license, get_repository_dashboard,
    get_result, list_licenses, receive_webhook,
};
pub use types::{
    ApiResponse, DashboardData, HeadInfo, HeadRepoInfo, HistoryData, HistoryEntry, JobView,
    PullRequestInfo, RepositoryInfo, RepositoryStats, SenderInfo, WebhookAccepted, WebhookPayload,
};
