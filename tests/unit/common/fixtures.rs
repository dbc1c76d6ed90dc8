//! Shared test fixtures: webhook payloads, scanner reports, policies

use prescan::models::{PullRequestAction, WebhookEvent};

/// A realistic pull-request webhook payload, as the forge sends it
pub fn webhook_payload(action: &str) -> serde_json::Value {
    serde_json::json!({
        "action": action,
        "pull_request": {
            "html_url": "https://github.com/acme/widget/pull/42",
            "url": "https://api.github.com/repos/acme/widget/pulls/42",
            "head": {
                "sha": "deadbeefcafe",
                "repo": {
                    "fork": false,
                    "html_url": "https://github.com/acme/widget"
                }
            }
        },
        "repository": {
            "html_url": "https://github.com/acme/widget"
        },
        "sender": {
            "login": "octocat"
        }
    })
}

/// A normalized webhook event targeting `pull/{number}` at `sha`
pub fn event(action: PullRequestAction, number: u32, sha: &str) -> WebhookEvent {
    WebhookEvent {
        action,
        pull_request_url: format!("https://github.com/acme/widget/pull/{number}"),
        pull_request_files_url: format!("https://github.com/acme/widget/pull/{number}"),
        pull_request_api_url: format!("https://api.github.com/repos/acme/widget/pulls/{number}"),
        repository_url: "https://github.com/acme/widget".to_string(),
        head_commit_sha: sha.to_string(),
        user: "octocat".to_string(),
        review_system: "github".to_string(),
        status_callback_url: None,
    }
}

/// A raw scanner report in the object-licenses shape
pub const SCANOSS_REPORT: &str = r#"{
    "src/lib.rs": [
        {
            "licenses": [
                {"name": "MIT", "source": "file_header"},
                {"name": "Apache-2.0", "source": "scancode"}
            ],
            "lines": "1-20",
            "matched": "98%",
            "component": "widget-core",
            "url": "https://example.com/widget-core"
        }
    ],
    "src/vendored.c": [
        {
            "licenses": [{"name": "GPL-3.0-only"}],
            "lines": "5-120",
            "matched": "100%"
        }
    ]
}"#;

/// The same semantics in the bare-id shape some tools emit
pub const BARE_ID_REPORT: &str = r#"{
    "src/lib.rs": [
        {"license_ids": ["MIT"], "line": "1-20", "matched": "98%"}
    ]
}"#;

/// A small policy file in TOML form
pub const POLICY_TOML: &str = r#"
[[licenses]]
spdx_id = "MIT"
name = "MIT License"
access = "permissive"
alternative_names = ["MIT License", "Expat"]

[[licenses]]
spdx_id = "GPL-3.0-only"
name = "GNU General Public License v3.0 only"
access = "restricted"
incompatible_with = ["MIT"]

[[licenses]]
spdx_id = "SSPL-1.0"
name = "Server Side Public License v1"
access = "forbidden"

[[conflicts]]
left = "EPL-1.0"
right = "MIT"

[[licenses]]
spdx_id = "EPL-1.0"
name = "Eclipse Public License 1.0"
access = "restricted"
"#;
