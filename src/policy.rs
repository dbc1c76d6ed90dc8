//! License policy store
//!
//! In-memory mapping from license identifier to its classification and
//! conflict rules, loaded once from a TOML file and shared read-only
//! across scan workers. Updated only out-of-band (edit the file,
//! restart the service).
//!
//! Lookup resolves by SPDX id first, then by alternative names, both
//! case-insensitive, because scanners are not consistent about the
//! exact identifier they report.

use std::path::Path;

use serde::Deserialize;

use crate::models::{Access, ConflictRule, LicensePolicy};

/// On-disk policy file shape
#[derive(Debug, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    licenses: Vec<LicensePolicy>,
    #[serde(default)]
    conflicts: Vec<ConflictPair>,
}

/// One standalone conflict pair from the policy file
#[derive(Debug, Deserialize)]
struct ConflictPair {
    left: String,
    right: String,
}

/// Read-only license policy store
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    licenses: Vec<LicensePolicy>,
    conflicts: Vec<(String, String)>,
}

impl PolicyStore {
    /// Load a policy store from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read policy file {}: {e}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Parse a policy store from TOML content
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let file: PolicyFile = toml::from_str(content)?;
        let conflicts = file.conflicts.into_iter().map(|c| (c.left, c.right)).collect();
        Ok(Self {
            licenses: file.licenses,
            conflicts,
        })
    }

    /// Build a store directly from parts (used by tests and tools)
    #[must_use]
    pub fn from_parts(licenses: Vec<LicensePolicy>, conflicts: Vec<(String, String)>) -> Self {
        Self { licenses, conflicts }
    }

    /// A small built-in policy covering the common OSS licenses.
    ///
    /// Used when no policy file is configured, so the one-off `scan`
    /// command works out of the box.
    #[must_use]
    pub fn builtin() -> Self {
        let entry = |spdx: &str, name: &str, access: Access, incompatible: &[&str]| LicensePolicy {
            spdx_id: spdx.to_string(),
            name: name.to_string(),
            access,
            alternative_names: Vec::new(),
            incompatible_with: incompatible.iter().map(ToString::to_string).collect(),
        };
        Self::from_parts(
            vec![
                entry("MIT", "MIT License", Access::Permissive, &[]),
                entry("Apache-2.0", "Apache License 2.0", Access::Permissive, &[]),
                entry("BSD-2-Clause", "BSD 2-Clause License", Access::Permissive, &[]),
                entry("BSD-3-Clause", "BSD 3-Clause License", Access::Permissive, &[]),
                entry("ISC", "ISC License", Access::Permissive, &[]),
                entry(
                    "GPL-2.0-only",
                    "GNU General Public License v2.0 only",
                    Access::Restricted,
                    &["MIT", "Apache-2.0", "BSD-2-Clause", "BSD-3-Clause"],
                ),
                entry(
                    "GPL-3.0-only",
                    "GNU General Public License v3.0 only",
                    Access::Restricted,
                    &["MIT", "Apache-2.0", "BSD-2-Clause", "BSD-3-Clause"],
                ),
                entry(
                    "LGPL-2.1-only",
                    "GNU Lesser General Public License v2.1 only",
                    Access::Restricted,
                    &[],
                ),
                entry(
                    "AGPL-3.0-only",
                    "GNU Affero General Public License v3.0 only",
                    Access::Forbidden,
                    &[],
                ),
            ],
            Vec::new(),
        )
    }

    /// Find a policy entry by SPDX id or alternative name
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&LicensePolicy> {
        self.licenses
            .iter()
            .find(|l| l.spdx_id.eq_ignore_ascii_case(id))
            .or_else(|| self.licenses.iter().find(|l| l.matches_name(id)))
    }

    /// Normalize a license identifier to its canonical SPDX id,
    /// falling back to the input when the license is unknown
    #[must_use]
    pub fn normalize<'a>(&'a self, id: &'a str) -> &'a str {
        self.find(id).map_or(id, |l| l.spdx_id.as_str())
    }

    /// Find the conflict rule between two licenses, if any.
    ///
    /// Conflicts are symmetric: both the standalone pair list and the
    /// per-license `incompatible_with` sets are checked in both
    /// directions.
    #[must_use]
    pub fn conflict_rule(&self, detected: &str, other: &str) -> Option<ConflictRule> {
        let pair_hit = self.conflicts.iter().any(|(a, b)| {
            (a.eq_ignore_ascii_case(detected) && b.eq_ignore_ascii_case(other))
                || (a.eq_ignore_ascii_case(other) && b.eq_ignore_ascii_case(detected))
        });
        let set_hit = self.find(detected).is_some_and(|l| l.conflicts_with(other))
            || self.find(other).is_some_and(|l| l.conflicts_with(detected));
        if pair_hit || set_hit {
            Some(ConflictRule {
                left: self.normalize(detected).to_string(),
                right: self.normalize(other).to_string(),
            })
        } else {
            None
        }
    }

    /// Iterate over all policy entries
    pub fn iter(&self) -> impl Iterator<Item = &LicensePolicy> {
        self.licenses.iter()
    }

    /// Number of policy entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.licenses.len()
    }

    /// Whether the store holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.licenses.is_empty()
    }
}
