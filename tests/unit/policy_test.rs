//! Policy store tests

use prescan::models::Access;
use prescan::policy::PolicyStore;

use crate::common::fixtures::POLICY_TOML;

#[test]
fn loads_policy_from_toml() {
    let store = PolicyStore::from_toml(POLICY_TOML).unwrap();
    assert_eq!(store.len(), 4);

    let gpl = store.find("GPL-3.0-only").unwrap();
    assert_eq!(gpl.access, Access::Restricted);
    assert!(gpl.conflicts_with("MIT"));
}

#[test]
fn resolves_alternative_names() {
    let store = PolicyStore::from_toml(POLICY_TOML).unwrap();
    assert_eq!(store.find("Expat").unwrap().spdx_id, "MIT");
    assert_eq!(store.find("expat").unwrap().spdx_id, "MIT");
    assert_eq!(store.normalize("Expat"), "MIT");
    assert_eq!(store.normalize("NotInPolicy"), "NotInPolicy");
}

#[test]
fn incompatible_with_is_checked_both_directions() {
    let store = PolicyStore::from_toml(POLICY_TOML).unwrap();
    // Only GPL-3.0-only declares the incompatibility, but the rule
    // fires whichever side is the detected license.
    assert!(store.conflict_rule("GPL-3.0-only", "MIT").is_some());
    assert!(store.conflict_rule("MIT", "GPL-3.0-only").is_some());
}

#[test]
fn standalone_pairs_are_symmetric() {
    let store = PolicyStore::from_toml(POLICY_TOML).unwrap();
    assert!(store.conflict_rule("EPL-1.0", "MIT").is_some());
    assert!(store.conflict_rule("MIT", "EPL-1.0").is_some());
    assert!(store.conflict_rule("EPL-1.0", "GPL-3.0-only").is_none());
}

#[test]
fn conflict_rule_carries_normalized_ids() {
    let store = PolicyStore::from_toml(POLICY_TOML).unwrap();
    let rule = store.conflict_rule("gpl-3.0-only", "Expat").unwrap();
    assert_eq!(rule.left, "GPL-3.0-only");
    assert_eq!(rule.right, "MIT");
    assert_eq!(rule.to_string(), "GPL-3.0-only <-> MIT");
}

#[test]
fn empty_toml_is_an_empty_store() {
    let store = PolicyStore::from_toml("").unwrap();
    assert!(store.is_empty());
}

#[test]
fn default_access_is_unreviewed() {
    let store = PolicyStore::from_toml(
        "[[licenses]]\nspdx_id = \"X-1.0\"\nname = \"X License\"\n",
    )
    .unwrap();
    assert_eq!(store.find("X-1.0").unwrap().access, Access::Unreviewed);
}
