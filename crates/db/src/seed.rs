//! Default data for a fresh store.

use std::collections::BTreeSet;

use chrono::{TimeZone, Utc};
use uuid::Uuid;
use veritas_core::document_type::DocumentType;
use veritas_core::types::Timestamp;

use crate::keys::{ALL_KEYS, DOCUMENT_VERSIONS_KEY, METADATA_KEY, SECTION_VERSIONS_KEY};
use crate::kv::{KvStore, StoreError};
use crate::models::document_version::DocumentVersion;
use crate::models::metadata::VersionMetadata;
use crate::models::section_version::SectionVersion;
use crate::records;

/// What [`seed`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// All three records were written.
    Seeded { documents: usize, sections: usize },
    /// At least one key already held data; nothing was written.
    Skipped { populated: Vec<&'static str> },
}

fn date(year: i32, month: u32, day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn default_documents() -> Vec<DocumentVersion> {
    vec![
        DocumentVersion {
            id: Uuid::new_v4(),
            version: "1.0.0".into(),
            document_type: DocumentType::Whitepaper,
            title: "VeritasVault.ai Whitepaper".into(),
            description: "Initial public release of the protocol whitepaper.".into(),
            changelog: "Initial release.".into(),
            release_date: date(2024, 1, 15),
            is_latest: false,
            sections: vec!["introduction".into(), "architecture".into()],
        },
        DocumentVersion {
            id: Uuid::new_v4(),
            version: "1.1.0".into(),
            document_type: DocumentType::Whitepaper,
            title: "VeritasVault.ai Whitepaper".into(),
            description: "Adds the tokenomics chapter and revised architecture.".into(),
            changelog: "Added tokenomics; expanded architecture overview.".into(),
            release_date: date(2024, 3, 1),
            is_latest: true,
            sections: vec![
                "introduction".into(),
                "architecture".into(),
                "tokenomics".into(),
            ],
        },
        DocumentVersion {
            id: Uuid::new_v4(),
            version: "1.0.0".into(),
            document_type: DocumentType::Litepaper,
            title: "VeritasVault.ai Litepaper".into(),
            description: "Condensed overview for a general audience.".into(),
            changelog: "Initial release.".into(),
            release_date: date(2024, 1, 15),
            is_latest: true,
            sections: vec!["introduction".into()],
        },
    ]
}

fn section(
    section_id: &str,
    title: &str,
    version: &str,
    document_types: &[DocumentType],
    tags: &[&str],
) -> SectionVersion {
    SectionVersion {
        id: Uuid::new_v4(),
        section_id: section_id.into(),
        title: title.into(),
        path: format!("/docs/{section_id}"),
        version: version.into(),
        last_updated: date(2024, 3, 1),
        document_types: document_types.iter().copied().collect(),
        tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
    }
}

fn default_sections() -> Vec<SectionVersion> {
    vec![
        section(
            "introduction",
            "Introduction",
            "1.0.0",
            &[DocumentType::Whitepaper, DocumentType::Litepaper],
            &["overview"],
        ),
        section(
            "architecture",
            "Architecture",
            "1.1.0",
            &[DocumentType::Whitepaper],
            &["technical", "protocol"],
        ),
        section(
            "tokenomics",
            "Tokenomics",
            "1.1.0",
            &[DocumentType::Whitepaper, DocumentType::Tokenomics],
            &["economics"],
        ),
    ]
}

/// Metadata consistent with `documents`: every version registered, every
/// type pointing at its latest record or the sentinel.
fn metadata_for(documents: &[DocumentVersion]) -> VersionMetadata {
    let mut meta = VersionMetadata::empty();
    for d in documents {
        meta.register_version(&d.version, d.release_date);
    }
    for t in DocumentType::ALL {
        let latest = documents
            .iter()
            .find(|d| d.document_type == t && d.is_latest)
            .map(|d| d.version.as_str());
        meta.set_latest(t, latest);
    }
    meta
}

/// Populate an empty store with default metadata, documents and sections.
///
/// If any of the three keys already holds data the store is left untouched.
pub async fn seed(store: &dyn KvStore) -> Result<SeedOutcome, StoreError> {
    let mut populated = Vec::new();
    for key in ALL_KEYS {
        if store.get(key).await?.is_some() {
            populated.push(key);
        }
    }
    if !populated.is_empty() {
        tracing::info!(?populated, "Store already has data, skipping seed");
        return Ok(SeedOutcome::Skipped { populated });
    }

    let documents = default_documents();
    let sections = default_sections();
    let mut metadata = metadata_for(&documents);

    metadata.documents_revision =
        records::save_if(store, DOCUMENT_VERSIONS_KEY, &documents, 0).await?;
    records::save_if(store, SECTION_VERSIONS_KEY, &sections, 0).await?;
    records::save_if(store, METADATA_KEY, &metadata, 0).await?;

    tracing::info!(
        documents = documents.len(),
        sections = sections.len(),
        "Seeded default version data",
    );
    Ok(SeedOutcome::Seeded {
        documents: documents.len(),
        sections: sections.len(),
    })
}
