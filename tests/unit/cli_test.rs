//! Integration tests for the prescan CLI

use assert_cmd::cargo;
use predicates::prelude::*;

fn prescan() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("prescan"))
}

#[test]
fn test_version() {
    prescan()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("prescan"));
}

#[test]
fn test_help() {
    prescan()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("license"));
}

#[test]
fn test_no_args_shows_info() {
    prescan().assert().success().stdout(predicate::str::contains("prescan"));
}

#[test]
fn test_version_subcommand_json() {
    prescan()
        .args(["version", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn test_policy_list_builtin() {
    prescan()
        .args(["policy", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MIT"))
        .stdout(predicate::str::contains("GPL-3.0-only"));
}

#[test]
fn test_policy_show_unknown_license_fails() {
    prescan()
        .args(["policy", "show", "No-Such-License"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No license"));
}

#[test]
fn test_policy_list_from_file() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("policy.toml");
    std::fs::write(
        &path,
        "[[licenses]]\nspdx_id = \"X-1.0\"\nname = \"X License\"\naccess = \"forbidden\"\n",
    )
    .unwrap();

    prescan()
        .args(["policy", "list", "--policy"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("X-1.0"))
        .stdout(predicate::str::contains("forbidden"));
}

#[test]
fn test_policy_list_json_output() {
    prescan()
        .args(["--json", "policy", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"spdx_id\""));
}
