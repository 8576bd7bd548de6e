//! Correlation of review results back to catalog entries.
//!
//! The review service only echoes a name and a path, and neither is
//! guaranteed to match the listing exactly. Rules are tried in a fixed
//! priority order over the whole catalog; the first rule that finds an entry
//! wins. When nothing matches, a descriptor is synthesised so every result
//! can still be previewed.

use serde::Serialize;
use tracing::debug;

use crate::models::cv::CvDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    ExactName,
    ExactPath,
    CatalogSubstringOfResult,
    ResultSubstringOfCatalog,
}

impl MatchRule {
    pub const PRIORITY: [MatchRule; 4] = [
        MatchRule::ExactName,
        MatchRule::ExactPath,
        MatchRule::CatalogSubstringOfResult,
        MatchRule::ResultSubstringOfCatalog,
    ];

    fn matches(self, entry: &CvDescriptor, result_name: &str, result_path: &str) -> bool {
        match self {
            MatchRule::ExactName => entry.name == result_name,
            // An absent path must not pair up with catalog entries lacking one.
            MatchRule::ExactPath => !result_path.is_empty() && entry.path == result_path,
            MatchRule::CatalogSubstringOfResult => result_name.contains(entry.name.as_str()),
            MatchRule::ResultSubstringOfCatalog => entry.name.contains(result_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
    pub descriptor: CvDescriptor,
    /// `None` when the descriptor was synthesised.
    pub rule: Option<MatchRule>,
}

/// Resolves a result's echoed name/path against `entries`, which must all
/// belong to `source`. Never fails.
pub fn resolve(
    result_name: &str,
    result_path: &str,
    entries: &[CvDescriptor],
    source: &str,
) -> Correlation {
    for rule in MatchRule::PRIORITY {
        if let Some(entry) = entries
            .iter()
            .find(|entry| rule.matches(entry, result_name, result_path))
        {
            return Correlation {
                descriptor: entry.clone(),
                rule: Some(rule),
            };
        }
    }

    debug!(
        "No catalog entry for result '{}' in source {}; synthesising descriptor",
        result_name, source
    );

    let path = if result_path.is_empty() {
        result_name
    } else {
        result_path
    };

    Correlation {
        descriptor: CvDescriptor {
            name: result_name.to_string(),
            path: path.to_string(),
            source: source.to_string(),
        },
        rule: None,
    }
}
