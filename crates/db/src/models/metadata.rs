//! Version metadata record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use veritas_core::document_type::DocumentType;
use veritas_core::types::Timestamp;
use veritas_core::version::{compare_versions, sort_versions, DEFAULT_VERSION, NO_VERSION};

/// The singleton record stored under `version:metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    /// Highest known version.
    pub current_version: String,
    /// Every known version, ascending, without duplicates.
    pub versions: Vec<String>,
    /// Latest version per document type; `"0.0.0"` when a type has none.
    pub latest_versions: BTreeMap<DocumentType, String>,
    /// First time each version was seen.
    pub release_date: BTreeMap<String, Timestamp>,
    /// Revision of the document list that `latest_versions` was computed from.
    #[serde(default)]
    pub documents_revision: u64,
}

impl VersionMetadata {
    /// The record written when the store has no metadata yet.
    pub fn initial(now: Timestamp) -> Self {
        Self {
            current_version: DEFAULT_VERSION.to_string(),
            versions: vec![DEFAULT_VERSION.to_string()],
            latest_versions: DocumentType::ALL
                .into_iter()
                .map(|t| (t, DEFAULT_VERSION.to_string()))
                .collect(),
            release_date: BTreeMap::from([(DEFAULT_VERSION.to_string(), now)]),
            documents_revision: 0,
        }
    }

    /// A record with no versions at all and every type at the sentinel.
    pub fn empty() -> Self {
        Self {
            current_version: NO_VERSION.to_string(),
            versions: Vec::new(),
            latest_versions: DocumentType::ALL
                .into_iter()
                .map(|t| (t, NO_VERSION.to_string()))
                .collect(),
            release_date: BTreeMap::new(),
            documents_revision: 0,
        }
    }

    /// Record a version as known.
    ///
    /// Unseen versions are inserted in sorted position and stamped with
    /// `seen_at`. A known version missing its release date gets one too.
    /// Returns `true` if anything changed.
    pub fn register_version(&mut self, version: &str, seen_at: Timestamp) -> bool {
        let mut changed = false;
        if !self.versions.iter().any(|v| v == version) {
            self.versions.push(version.to_string());
            sort_versions(&mut self.versions);
            changed = true;
        }
        if !self.release_date.contains_key(version) {
            self.release_date.insert(version.to_string(), seen_at);
            changed = true;
        }
        if let Some(highest) = self.versions.last() {
            if compare_versions(highest, &self.current_version).is_gt() {
                self.current_version = highest.clone();
                changed = true;
            }
        }
        changed
    }

    /// Point `doc_type` at `version`, or at the sentinel when `None`.
    pub fn set_latest(&mut self, doc_type: DocumentType, version: Option<&str>) {
        self.latest_versions
            .insert(doc_type, version.unwrap_or(NO_VERSION).to_string());
    }

    /// Adopt the latest versions seen in the document list at `revision`.
    ///
    /// A view older than the one already applied is ignored and `false` is
    /// returned, so a slow writer cannot roll back a newer writer's result.
    pub fn apply_latest(
        &mut self,
        revision: u64,
        latest: &[(DocumentType, Option<String>)],
    ) -> bool {
        if revision < self.documents_revision {
            return false;
        }
        for (doc_type, version) in latest {
            self.set_latest(*doc_type, version.as_deref());
        }
        self.documents_revision = revision;
        true
    }

    /// The latest version recorded for `doc_type`, ignoring the sentinel.
    pub fn latest_for(&self, doc_type: DocumentType) -> Option<&str> {
        self.latest_versions
            .get(&doc_type)
            .map(String::as_str)
            .filter(|v| *v != NO_VERSION)
    }
}
