//! Service configuration
//!
//! Loaded from `prescan.toml` (every field optional, serde defaults),
//! with environment overrides for the knobs that differ per
//! deployment. A missing config file is not an error: the defaults are
//! a working local setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths;

/// Environment variable overriding the forge API token
pub const ENV_GITHUB_TOKEN: &str = "PRESCAN_GITHUB_TOKEN";

/// Environment variable overriding the bind address
pub const ENV_BIND: &str = "PRESCAN_BIND";

/// Environment variable overriding the state directory
pub const ENV_STATE_DIR: &str = "PRESCAN_STATE_DIR";

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the webhook/query server binds to
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Worker pool size; defaults to the available parallelism
    #[serde(default)]
    pub workers: Option<usize>,
    /// Maximum claim attempts before a job fails terminally
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Scanner executable
    #[serde(default = "default_scanner_command")]
    pub scanner_command: String,
    /// Wall-clock budget for one scanner invocation, in seconds
    #[serde(default = "default_scanner_timeout")]
    pub scanner_timeout_secs: u64,
    /// State directory; defaults to `~/.prescan`
    #[serde(default)]
    pub state_dir: Option<PathBuf>,
    /// License policy file; defaults to the built-in policy
    #[serde(default)]
    pub policy_file: Option<PathBuf>,
    /// Page size for the history endpoint
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Forge API base URL
    #[serde(default = "default_github_api_url")]
    pub github_api_url: String,
    /// Forge API token, if scans target private repositories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_token: Option<String>,
    /// Base URL used to build result links in status callbacks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_url_base: Option<String>,
}

fn default_bind() -> String {
    "127.0.0.1:7824".to_string()
}

const fn default_max_attempts() -> u32 {
    4
}

fn default_scanner_command() -> String {
    "scanoss-py".to_string()
}

const fn default_scanner_timeout() -> u64 {
    600
}

const fn default_page_size() -> usize {
    20
}

fn default_github_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            workers: None,
            max_attempts: default_max_attempts(),
            scanner_command: default_scanner_command(),
            scanner_timeout_secs: default_scanner_timeout(),
            state_dir: None,
            policy_file: None,
            page_size: default_page_size(),
            github_api_url: default_github_api_url(),
            github_token: None,
            result_url_base: None,
        }
    }
}

impl Config {
    /// Load config from the given path, or `./prescan.toml` when none
    /// is given. A missing file yields the defaults; environment
    /// overrides are applied either way.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = path.map_or_else(|| PathBuf::from(paths::CONFIG_FILE), Path::to_path_buf);
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Invalid config {}: {e}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment overrides
    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(ENV_GITHUB_TOKEN)
            && !token.is_empty()
        {
            self.github_token = Some(token);
        }
        if let Ok(bind) = std::env::var(ENV_BIND)
            && !bind.is_empty()
        {
            self.bind = bind;
        }
        if let Ok(dir) = std::env::var(ENV_STATE_DIR)
            && !dir.is_empty()
        {
            self.state_dir = Some(PathBuf::from(dir));
        }
    }

    /// Effective worker pool size
    #[must_use]
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(2, std::num::NonZeroUsize::get)
        })
    }

    /// Effective state directory
    #[must_use]
    pub fn effective_state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(paths::default_state_dir)
    }
}
