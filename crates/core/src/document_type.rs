//! The fixed set of publishable document kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A publishable document kind.
///
/// Serialized as `whitepaper`, `litepaper`, `tokenomics` and
/// `executiveSummary`, matching the keys used in `latestVersions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentType {
    Whitepaper,
    Litepaper,
    Tokenomics,
    ExecutiveSummary,
}

impl DocumentType {
    /// Every document type, in display order.
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Whitepaper,
        DocumentType::Litepaper,
        DocumentType::Tokenomics,
        DocumentType::ExecutiveSummary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Whitepaper => "whitepaper",
            DocumentType::Litepaper => "litepaper",
            DocumentType::Tokenomics => "tokenomics",
            DocumentType::ExecutiveSummary => "executiveSummary",
        }
    }

    /// Comma-separated list of valid names, for error messages.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid document type '{s}'. Valid types: {}",
                    Self::valid_names()
                ))
            })
    }
}
