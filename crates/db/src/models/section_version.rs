//! Section version model and DTOs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use validator::Validate;
use veritas_core::document_type::DocumentType;
use veritas_core::types::{RecordId, Timestamp};

use super::document_version::validate_version_field;

/// Metadata for one reusable content section at a given version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionVersion {
    pub id: RecordId,
    /// Stable human-meaningful identifier, e.g. `architecture`.
    pub section_id: String,
    pub title: String,
    pub path: String,
    pub version: String,
    pub last_updated: Timestamp,
    pub document_types: BTreeSet<DocumentType>,
    pub tags: BTreeSet<String>,
}

/// DTO for creating a section version.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionVersion {
    #[validate(length(min = 1, max = 100))]
    pub section_id: String,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub path: String,
    #[validate(custom(function = "validate_version_field"))]
    pub version: String,
    pub last_updated: Timestamp,
    pub document_types: BTreeSet<DocumentType>,
    pub tags: BTreeSet<String>,
}

/// DTO for updating a section version.
///
/// `id` and `sectionId` are fixed at creation and cannot be patched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSectionVersion {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub path: Option<String>,
    #[validate(custom(function = "validate_version_field"))]
    pub version: Option<String>,
    pub last_updated: Option<Timestamp>,
    pub document_types: Option<BTreeSet<DocumentType>>,
    pub tags: Option<BTreeSet<String>>,
}

impl SectionVersion {
    pub fn from_input(id: RecordId, input: &CreateSectionVersion) -> Self {
        Self {
            id,
            section_id: input.section_id.clone(),
            title: input.title.clone(),
            path: input.path.clone(),
            version: input.version.clone(),
            last_updated: input.last_updated,
            document_types: input.document_types.clone(),
            tags: input.tags.clone(),
        }
    }

    pub fn apply(&mut self, patch: &UpdateSectionVersion) {
        if let Some(v) = &patch.title {
            self.title = v.clone();
        }
        if let Some(v) = &patch.path {
            self.path = v.clone();
        }
        if let Some(v) = &patch.version {
            self.version = v.clone();
        }
        if let Some(v) = patch.last_updated {
            self.last_updated = v;
        }
        if let Some(v) = &patch.document_types {
            self.document_types = v.clone();
        }
        if let Some(v) = &patch.tags {
            self.tags = v.clone();
        }
    }
}
