//! Scan report parser
//!
//! Turns the scanner's raw JSON report into normalized
//! [`LicenseMatch`](crate::models::LicenseMatch) records. The report
//! schema is owned by the scanning tool: a JSON object mapping file
//! path to a list of match objects, each carrying zero or more
//! candidate licenses plus a line/similarity reference.
//!
//! The parser is deliberately tolerant. Missing optional fields become
//! an unknown-license match; only an unparseable top level is an
//! error.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::LicenseMatch;
use crate::scanner::ScanError;

/// License id used for matches the scanner reported without one
pub const UNKNOWN_LICENSE: &str = "NOASSERTION";

/// One candidate license inside a raw match object.
///
/// Tools disagree on the shape: some emit bare id strings
/// (`"license_ids": ["MIT"]`), others emit objects with a `name`
/// field (`"licenses": [{"name": "MIT", ...}]`). Both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLicense {
    Id(String),
    Detailed {
        name: String,
    },
}

impl RawLicense {
    fn id(&self) -> &str {
        match self {
            Self::Id(id) | Self::Detailed { name: id } => id,
        }
    }
}

/// One raw match object as emitted by the scanner
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMatch {
    #[serde(alias = "license_ids")]
    licenses: Vec<RawLicense>,
    #[serde(alias = "line")]
    lines: Option<String>,
    matched: Option<String>,
    component: Option<String>,
    url: Option<String>,
}

/// Parse raw report content into normalized license matches.
///
/// A match object with several candidate licenses yields one
/// `LicenseMatch` per candidate. An empty or blank report yields an
/// empty list. Fails with [`ScanError::MalformedReport`] only when the
/// top-level structure is not valid JSON of the expected shape.
pub fn parse_report(content: &str) -> Result<Vec<LicenseMatch>, ScanError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    // BTreeMap keeps the match order stable across runs.
    let raw: BTreeMap<String, Vec<serde_json::Value>> = serde_json::from_str(content)
        .map_err(|e| ScanError::MalformedReport(e.to_string()))?;

    let mut matches = Vec::new();
    for (file_path, entries) in raw {
        for entry in entries {
            // A malformed individual entry degrades to an
            // unknown-license match instead of failing the report.
            let m: RawMatch = serde_json::from_value(entry).unwrap_or_default();
            push_matches(&mut matches, &file_path, &m);
        }
    }
    Ok(matches)
}

fn push_matches(out: &mut Vec<LicenseMatch>, file_path: &str, m: &RawMatch) {
    let build = |license: String| LicenseMatch {
        file_path: file_path.to_string(),
        license,
        matched_lines: m.lines.clone(),
        match_percent: m.matched.clone(),
        component: m.component.clone(),
        component_url: m.url.clone(),
    };
    if m.licenses.is_empty() {
        out.push(build(UNKNOWN_LICENSE.to_string()));
    } else {
        for license in &m.licenses {
            out.push(build(license.id().to_string()));
        }
    }
}
