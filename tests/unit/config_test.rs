//! Config loading tests
//!
//! Environment-touching tests are serialized; `std::env::set_var` is
//! process-global.

use std::path::PathBuf;

use serial_test::serial;

use prescan::config::{Config, ENV_BIND, ENV_GITHUB_TOKEN, ENV_STATE_DIR};

#[test]
#[serial]
fn missing_file_yields_defaults() {
    clear_env();
    let config = Config::load(Some(&PathBuf::from("/nonexistent/prescan.toml"))).unwrap();
    assert_eq!(config.bind, "127.0.0.1:7824");
    assert_eq!(config.max_attempts, 4);
    assert_eq!(config.scanner_command, "scanoss-py");
    assert_eq!(config.scanner_timeout_secs, 600);
    assert_eq!(config.page_size, 20);
    assert!(config.github_token.is_none());
}

#[test]
#[serial]
fn partial_file_keeps_defaults_for_the_rest() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prescan.toml");
    std::fs::write(&path, "bind = \"0.0.0.0:9000\"\nmax_attempts = 2\n").unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.bind, "0.0.0.0:9000");
    assert_eq!(config.max_attempts, 2);
    assert_eq!(config.scanner_command, "scanoss-py");
}

#[test]
#[serial]
fn invalid_file_is_an_error() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prescan.toml");
    std::fs::write(&path, "bind = [this is not toml").unwrap();
    assert!(Config::load(Some(&path)).is_err());
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prescan.toml");
    std::fs::write(&path, "bind = \"0.0.0.0:9000\"\n").unwrap();

    unsafe {
        std::env::set_var(ENV_BIND, "127.0.0.1:8000");
        std::env::set_var(ENV_GITHUB_TOKEN, "ghp_test");
        std::env::set_var(ENV_STATE_DIR, "/tmp/prescan-test");
    }
    let config = Config::load(Some(&path)).unwrap();
    clear_env();

    assert_eq!(config.bind, "127.0.0.1:8000");
    assert_eq!(config.github_token.as_deref(), Some("ghp_test"));
    assert_eq!(config.effective_state_dir(), PathBuf::from("/tmp/prescan-test"));
}

#[test]
#[serial]
fn effective_workers_defaults_to_parallelism() {
    clear_env();
    let config = Config::default();
    assert!(config.effective_workers() >= 1);

    let config = Config { workers: Some(3), ..Config::default() };
    assert_eq!(config.effective_workers(), 3);
}

fn clear_env() {
    unsafe {
        std::env::remove_var(ENV_BIND);
        std::env::remove_var(ENV_GITHUB_TOKEN);
        std::env::remove_var(ENV_STATE_DIR);
    }
}
