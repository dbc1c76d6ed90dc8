//! `prescan policy` - inspect the license policy

use std::path::Path;

use crate::cli::PolicyAction;
use crate::output::{OutputMode, PolicyListing};
use crate::policy::PolicyStore;

/// List or show policy entries
pub fn policy_cmd(action: &PolicyAction, output_mode: OutputMode) -> anyhow::Result<()> {
    match action {
        PolicyAction::List { policy } => {
            let store = load(policy.as_deref())?;
            PolicyListing { licenses: store.iter().cloned().collect() }.render(output_mode);
            Ok(())
        },
        PolicyAction::Show { id, policy } => {
            let store = load(policy.as_deref())?;
            let Some(license) = store.find(id) else {
                anyhow::bail!("No license '{id}' in the policy");
            };
            PolicyListing { licenses: vec![license.clone()] }.render(output_mode);
            Ok(())
        },
    }
}

fn load(path: Option<&Path>) -> anyhow::Result<PolicyStore> {
    match path {
        Some(p) => PolicyStore::load(p),
        None => Ok(PolicyStore::builtin()),
    }
}
