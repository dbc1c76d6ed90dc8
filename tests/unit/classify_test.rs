//! License classifier tests

use prescan::classify::{classify, has_issue, license_counts};
use prescan::models::{LicenseMatch, VerdictStatus};
use prescan::policy::PolicyStore;

use crate::common::fixtures::POLICY_TOML;

fn m(file: &str, license: &str) -> LicenseMatch {
    LicenseMatch {
        file_path: file.to_string(),
        license: license.to_string(),
        matched_lines: None,
        match_percent: None,
        component: None,
        component_url: None,
    }
}

#[test]
fn restricted_license_conflicts_with_repo_license() {
    let policy = PolicyStore::from_toml(POLICY_TOML).unwrap();
    let verdicts = classify(Some("MIT"), &[m("src/vendored.c", "GPL-3.0-only")], &policy);

    assert_eq!(verdicts.len(), 1);
    assert_eq!(verdicts[0].status, VerdictStatus::Conflicting);
    let rule = verdicts[0].rule.as_ref().unwrap();
    assert_eq!(rule.left, "GPL-3.0-only");
    assert_eq!(rule.right, "MIT");
    assert!(has_issue(&verdicts));
}

#[test]
fn permissive_license_is_permitted() {
    let policy = PolicyStore::builtin();
    let verdicts = classify(Some("MIT"), &[m("src/lib.rs", "BSD-3-Clause")], &policy);
    assert_eq!(verdicts[0].status, VerdictStatus::Permitted);
    assert!(verdicts[0].rule.is_none());
    assert!(!has_issue(&verdicts));
}

#[test]
fn unknown_license_is_flagged_not_failing() {
    let policy = PolicyStore::builtin();
    let verdicts = classify(Some("MIT"), &[m("src/odd.c", "Unknown-9000")], &policy);
    assert_eq!(verdicts[0].status, VerdictStatus::Unreviewed);
    assert!(!has_issue(&verdicts), "unreviewed alone must not raise the issue flag");
}

#[test]
fn forbidden_license_conflicts_regardless_of_repo_license() {
    let policy = PolicyStore::from_toml(POLICY_TOML).unwrap();
    let verdicts = classify(None, &[m("src/db.rs", "SSPL-1.0")], &policy);
    assert_eq!(verdicts[0].status, VerdictStatus::Conflicting);
    assert!(verdicts[0].rule.is_none());
}

#[test]
fn standalone_conflict_pair_fires() {
    let policy = PolicyStore::from_toml(POLICY_TOML).unwrap();
    let verdicts = classify(Some("MIT"), &[m("src/ui.java", "EPL-1.0")], &policy);
    assert_eq!(verdicts[0].status, VerdictStatus::Conflicting);
}

#[test]
fn missing_repo_license_only_checks_forbidden() {
    let policy = PolicyStore::builtin();
    // Without a repo license there is nothing for GPL to conflict with
    let verdicts = classify(None, &[m("src/vendored.c", "GPL-3.0-only")], &policy);
    assert_eq!(verdicts[0].status, VerdictStatus::Permitted);
}

#[test]
fn repo_license_alternative_name_is_normalized() {
    let policy = PolicyStore::from_toml(POLICY_TOML).unwrap();
    // "Expat" is an alternative name for MIT in the policy
    let verdicts = classify(Some("Expat"), &[m("src/vendored.c", "GPL-3.0-only")], &policy);
    assert_eq!(verdicts[0].status, VerdictStatus::Conflicting);
}

#[test]
fn one_verdict_per_match_in_input_order() {
    let policy = PolicyStore::builtin();
    let matches = vec![m("a.rs", "MIT"), m("b.rs", "Unknown-9000"), m("a.rs", "MIT")];
    let verdicts = classify(Some("MIT"), &matches, &policy);

    assert_eq!(verdicts.len(), 3);
    assert_eq!(verdicts[0].matched.file_path, "a.rs");
    assert_eq!(verdicts[1].matched.license, "Unknown-9000");

    let counts = license_counts(&verdicts);
    assert_eq!(counts["MIT"], 2);
    assert_eq!(counts["Unknown-9000"], 1);
}

#[test]
fn classification_is_deterministic() {
    let policy = PolicyStore::builtin();
    let matches = vec![m("a.rs", "GPL-3.0-only"), m("b.rs", "MIT")];
    let first = classify(Some("MIT"), &matches, &policy);
    let second = classify(Some("MIT"), &matches, &policy);
    assert_eq!(first, second);
}
