//! Document version model, DTOs and the "latest" election rules.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use veritas_core::document_type::DocumentType;
use veritas_core::types::{RecordId, Timestamp};
use veritas_core::version::{highest_index, is_strict_version};

/// One published version of a document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersion {
    pub id: RecordId,
    pub version: String,
    pub document_type: DocumentType,
    pub title: String,
    pub description: String,
    pub changelog: String,
    pub release_date: Timestamp,
    pub is_latest: bool,
    /// Section ids included in this version, in display order.
    pub sections: Vec<String>,
}

pub(crate) fn validate_version_field(version: &str) -> Result<(), ValidationError> {
    if is_strict_version(version) {
        Ok(())
    } else {
        Err(ValidationError::new("version_format")
            .with_message("version must look like MAJOR.MINOR.PATCH".into()))
    }
}

/// DTO for creating a document version. The id is assigned by the repository.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentVersion {
    #[validate(custom(function = "validate_version_field"))]
    pub version: String,
    pub document_type: DocumentType,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: String,
    pub changelog: String,
    /// Stamped by the server on HTTP creates.
    #[serde(default = "Utc::now")]
    pub release_date: Timestamp,
    pub is_latest: bool,
    pub sections: Vec<String>,
}

/// DTO for updating a document version. Only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateDocumentVersion {
    #[validate(custom(function = "validate_version_field"))]
    pub version: Option<String>,
    pub document_type: Option<DocumentType>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub changelog: Option<String>,
    pub release_date: Option<Timestamp>,
    pub is_latest: Option<bool>,
    pub sections: Option<Vec<String>>,
}

impl DocumentVersion {
    /// Build a new record from a create DTO.
    pub fn from_input(id: RecordId, input: &CreateDocumentVersion) -> Self {
        Self {
            id,
            version: input.version.clone(),
            document_type: input.document_type,
            title: input.title.clone(),
            description: input.description.clone(),
            changelog: input.changelog.clone(),
            release_date: input.release_date,
            is_latest: input.is_latest,
            sections: input.sections.clone(),
        }
    }

    /// Shallow-merge the provided fields. `id` is never touched.
    pub fn apply(&mut self, patch: &UpdateDocumentVersion) {
        if let Some(v) = &patch.version {
            self.version = v.clone();
        }
        if let Some(t) = patch.document_type {
            self.document_type = t;
        }
        if let Some(v) = &patch.title {
            self.title = v.clone();
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
        if let Some(v) = &patch.changelog {
            self.changelog = v.clone();
        }
        if let Some(v) = patch.release_date {
            self.release_date = v;
        }
        if let Some(v) = patch.is_latest {
            self.is_latest = v;
        }
        if let Some(v) = &patch.sections {
            self.sections = v.clone();
        }
    }
}

// ---------------------------------------------------------------------------
// Latest election
// ---------------------------------------------------------------------------

/// How to settle the latest flag for one document type after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestChoice {
    /// This record was just flagged latest: demote every other one.
    Prefer(RecordId),
    /// This record was just unflagged: promote someone else if possible.
    Avoid(RecordId),
    /// Only repair: fill a gap or break a tie.
    Keep,
}

/// Enforce "exactly one latest per document type" over `list`.
///
/// Any type with at least one record ends up with exactly one record flagged
/// `is_latest`; when a new one has to be picked, the highest version wins and
/// among equal versions the earliest record in list order. `Avoid(id)` skips
/// `id` unless it is the only record of the type.
///
/// Returns the version of the resulting latest record, or `None` if the type
/// has no records.
pub fn settle_latest(
    list: &mut [DocumentVersion],
    doc_type: DocumentType,
    choice: LatestChoice,
) -> Option<String> {
    let of_type: Vec<usize> = list
        .iter()
        .enumerate()
        .filter(|(_, d)| d.document_type == doc_type)
        .map(|(i, _)| i)
        .collect();
    if of_type.is_empty() {
        return None;
    }

    let winner = match choice {
        LatestChoice::Prefer(id) => of_type.iter().copied().find(|&i| list[i].id == id),
        LatestChoice::Avoid(_) | LatestChoice::Keep => None,
    };

    let winner = winner.or_else(|| {
        let flagged: Vec<usize> = of_type
            .iter()
            .copied()
            .filter(|&i| list[i].is_latest)
            .collect();
        highest_index(flagged.iter().map(|&i| list[i].version.as_str())).map(|k| flagged[k])
    });

    let winner = winner.or_else(|| {
        let avoid = match choice {
            LatestChoice::Avoid(id) => Some(id),
            _ => None,
        };
        let candidates: Vec<usize> = of_type
            .iter()
            .copied()
            .filter(|&i| Some(list[i].id) != avoid)
            .collect();
        let pool = if candidates.is_empty() { &of_type } else { &candidates };
        highest_index(pool.iter().map(|&i| list[i].version.as_str())).map(|k| pool[k])
    })?;

    for &i in &of_type {
        list[i].is_latest = i == winner;
    }
    Some(list[winner].version.clone())
}
