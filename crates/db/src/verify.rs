//! Read-only consistency check across the three records.

use std::collections::BTreeSet;

use serde_json::Value;
use veritas_core::document_type::DocumentType;

use crate::keys::{DOCUMENT_VERSIONS_KEY, METADATA_KEY, SECTION_VERSIONS_KEY};
use crate::kv::{KvStore, StoreError};
use crate::models::document_version::DocumentVersion;
use crate::models::metadata::VersionMetadata;
use crate::records;

/// Findings of [`verify`]. An empty `issues` list means the store is consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub documents: usize,
    pub sections: usize,
    pub issues: Vec<String>,
}

impl VerifyReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

fn check_metadata(
    meta: &VersionMetadata,
    documents: &[DocumentVersion],
    issues: &mut Vec<String>,
) {
    for v in &meta.versions {
        if !documents.iter().any(|d| &d.version == v) {
            issues.push(format!("Metadata version {v} has no matching document version"));
        }
        if !meta.release_date.contains_key(v) {
            issues.push(format!("Metadata version {v} has no release date"));
        }
    }

    for t in DocumentType::ALL {
        let of_type: Vec<&DocumentVersion> =
            documents.iter().filter(|d| d.document_type == t).collect();

        match meta.latest_for(t) {
            Some(v) => {
                if !of_type.iter().any(|d| d.version == v && d.is_latest) {
                    issues.push(format!(
                        "Latest {t} version {v} does not match a document flagged as latest"
                    ));
                }
                if !meta.versions.iter().any(|known| known == v) {
                    issues.push(format!("Latest {t} version {v} is not a known version"));
                }
            }
            None if !of_type.is_empty() => {
                issues.push(format!(
                    "{t} has {} document version(s) but no latest version in metadata",
                    of_type.len()
                ));
            }
            None => {}
        }
    }
}

fn check_documents(documents: &[DocumentVersion], issues: &mut Vec<String>) {
    for t in DocumentType::ALL {
        let flagged = documents
            .iter()
            .filter(|d| d.document_type == t && d.is_latest)
            .count();
        if flagged > 1 {
            issues.push(format!("{t} has {flagged} versions flagged as latest"));
        }
    }
}

fn check_sections(sections: &[Value], issues: &mut Vec<String>) {
    let valid: BTreeSet<&str> = DocumentType::ALL.iter().map(|t| t.as_str()).collect();
    for (i, section) in sections.iter().enumerate() {
        let label = section
            .get("sectionId")
            .and_then(Value::as_str)
            .map_or_else(|| format!("#{i}"), str::to_string);

        let Some(types) = section.get("documentTypes").and_then(Value::as_array) else {
            issues.push(format!("Section {label} has no documentTypes list"));
            continue;
        };
        for t in types {
            match t.as_str() {
                Some(name) if valid.contains(name) => {}
                _ => issues.push(format!("Section {label} has invalid document type {t}")),
            }
        }
    }
}

/// Re-read all records and report every invariant violation. Never repairs.
pub async fn verify(store: &dyn KvStore) -> Result<VerifyReport, StoreError> {
    let documents: Vec<DocumentVersion> =
        records::load_or_default(store, DOCUMENT_VERSIONS_KEY).await?;
    let sections: Vec<Value> = records::load_or_default(store, SECTION_VERSIONS_KEY).await?;
    let metadata = records::load::<VersionMetadata>(store, METADATA_KEY).await?;

    let mut issues = Vec::new();
    match &metadata {
        Some(meta) => check_metadata(&meta.value, &documents, &mut issues),
        None => issues.push("Version metadata record is missing".to_string()),
    }
    check_documents(&documents, &mut issues);
    check_sections(&sections, &mut issues);

    for issue in &issues {
        tracing::warn!(%issue, "Consistency check failed");
    }

    Ok(VerifyReport {
        documents: documents.len(),
        sections: sections.len(),
        issues,
    })
}
