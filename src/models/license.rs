//! License policy model
//!
//! Reference data: one entry per known license, carrying its usage
//! classification and conflict set. Read-only during scans.

use serde::{Deserialize, Serialize};

/// Usage classification of a license
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Free to include
    Permissive,
    /// Allowed with conditions; conflict rules decide per pairing
    Restricted,
    /// Never allowed, regardless of the repository license
    Forbidden,
    /// Not yet reviewed by the policy owners
    #[default]
    Unreviewed,
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Permissive => write!(f, "permissive"),
            Self::Restricted => write!(f, "restricted"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::Unreviewed => write!(f, "unreviewed"),
        }
    }
}

impl std::str::FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "permissive" | "permitted" => Ok(Self::Permissive),
            "restricted" => Ok(Self::Restricted),
            "forbidden" | "prohibited" => Ok(Self::Forbidden),
            "unreviewed" => Ok(Self::Unreviewed),
            _ => Err(format!(
                "Unknown access kind: {s}. Use: permissive, restricted, forbidden, unreviewed"
            )),
        }
    }
}

/// One license policy entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensePolicy {
    /// SPDX identifier (e.g., "GPL-3.0-only")
    pub spdx_id: String,
    /// Human-readable license name
    pub name: String,
    /// Usage classification
    #[serde(default)]
    pub access: Access,
    /// Alternative names the scanner may report this license under
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<String>,
    /// SPDX identifiers this license conflicts with
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatible_with: Vec<String>,
}

impl LicensePolicy {
    /// Whether `candidate` names this license (SPDX id or any
    /// alternative name, case-insensitive)
    #[must_use]
    pub fn matches_name(&self, candidate: &str) -> bool {
        self.spdx_id.eq_ignore_ascii_case(candidate)
            || self.alternative_names.iter().any(|n| n.eq_ignore_ascii_case(candidate))
    }

    /// Whether `other` appears in this license's conflict set
    #[must_use]
    pub fn conflicts_with(&self, other: &str) -> bool {
        self.incompatible_with.iter().any(|n| n.eq_ignore_ascii_case(other))
    }
}
