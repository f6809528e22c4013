//! Repository for the `document:versions` list.
//!
//! Every write goes list first, metadata second. The metadata write
//! recomputes `latestVersions` for all document types from the list just
//! written, so a metadata record left stale by an interrupted write is
//! repaired by the next successful one. The list revision travels with that
//! view, and metadata never goes back to an older revision.

use uuid::Uuid;
use veritas_core::document_type::DocumentType;
use veritas_core::types::RecordId;

use crate::keys::DOCUMENT_VERSIONS_KEY;
use crate::kv::{KvStore, StoreError, Versioned};
use crate::models::document_version::{
    settle_latest, CreateDocumentVersion, DocumentVersion, LatestChoice, UpdateDocumentVersion,
};
use crate::records;
use crate::repositories::MetadataRepo;

/// Latest version per document type as seen in `list`.
fn latest_by_type(list: &[DocumentVersion]) -> Vec<(DocumentType, Option<String>)> {
    DocumentType::ALL
        .into_iter()
        .map(|t| {
            let latest = list
                .iter()
                .find(|d| d.document_type == t && d.is_latest)
                .map(|d| d.version.clone());
            (t, latest)
        })
        .collect()
}

/// CRUD over document versions, maintaining the one-latest-per-type rule.
pub struct DocumentVersionRepo;

impl DocumentVersionRepo {
    /// List every document version in stored order.
    pub async fn list(store: &dyn KvStore) -> Result<Vec<DocumentVersion>, StoreError> {
        records::load_or_default(store, DOCUMENT_VERSIONS_KEY).await
    }

    /// List the versions of a single document type.
    pub async fn list_by_type(
        store: &dyn KvStore,
        doc_type: DocumentType,
    ) -> Result<Vec<DocumentVersion>, StoreError> {
        let mut list = Self::list(store).await?;
        list.retain(|d| d.document_type == doc_type);
        Ok(list)
    }

    /// Find a document version by id.
    pub async fn find_by_id(
        store: &dyn KvStore,
        id: RecordId,
    ) -> Result<Option<DocumentVersion>, StoreError> {
        Ok(Self::list(store).await?.into_iter().find(|d| d.id == id))
    }

    /// Insert a new document version.
    ///
    /// A version flagged latest demotes every other record of its type. The
    /// first record of a type becomes latest even when not flagged.
    pub async fn create(
        store: &dyn KvStore,
        input: &CreateDocumentVersion,
    ) -> Result<DocumentVersion, StoreError> {
        let id = Uuid::new_v4();
        let record = DocumentVersion::from_input(id, input);

        let written = records::mutate_versioned(
            store,
            DOCUMENT_VERSIONS_KEY,
            Vec::new,
            |list: &mut Vec<DocumentVersion>| {
                list.push(record.clone());
                let choice = if record.is_latest {
                    LatestChoice::Prefer(id)
                } else {
                    LatestChoice::Keep
                };
                settle_latest(list, record.document_type, choice);
                let created = list.iter().find(|d| d.id == id).cloned()?;
                Some((created, latest_by_type(list)))
            },
        )
        .await?
        .ok_or_else(|| StoreError::Protocol("created record missing from list".into()))?;
        let (created, latest) = written.value;

        MetadataRepo::sync(
            store,
            std::slice::from_ref(&created.version),
            &latest,
            written.revision,
        )
        .await?;

        tracing::info!(
            id = %created.id,
            document_type = %created.document_type,
            version = %created.version,
            is_latest = created.is_latest,
            "Document version created",
        );
        Ok(created)
    }

    /// Apply a partial update. Returns `None` if no record has this id.
    pub async fn update(
        store: &dyn KvStore,
        id: RecordId,
        patch: &UpdateDocumentVersion,
    ) -> Result<Option<DocumentVersion>, StoreError> {
        let outcome = records::mutate_versioned(
            store,
            DOCUMENT_VERSIONS_KEY,
            Vec::new,
            |list: &mut Vec<DocumentVersion>| {
                let record = list.iter_mut().find(|d| d.id == id)?;
                let old_type = record.document_type;
                let was_latest = record.is_latest;
                record.apply(patch);
                let new_type = record.document_type;
                let is_latest = record.is_latest;

                let type_changed = old_type != new_type;
                let choice = if is_latest && (patch.is_latest == Some(true) || type_changed) {
                    LatestChoice::Prefer(id)
                } else if was_latest && !is_latest {
                    LatestChoice::Avoid(id)
                } else {
                    LatestChoice::Keep
                };
                settle_latest(list, new_type, choice);
                if type_changed {
                    settle_latest(list, old_type, LatestChoice::Keep);
                }

                let updated = list.iter().find(|d| d.id == id).cloned()?;
                Some((updated, latest_by_type(list)))
            },
        )
        .await?;

        let Some(Versioned {
            value: (updated, latest),
            revision,
        }) = outcome
        else {
            return Ok(None);
        };

        MetadataRepo::sync(
            store,
            std::slice::from_ref(&updated.version),
            &latest,
            revision,
        )
        .await?;

        tracing::info!(
            id = %updated.id,
            document_type = %updated.document_type,
            version = %updated.version,
            is_latest = updated.is_latest,
            "Document version updated",
        );
        Ok(Some(updated))
    }

    /// Delete a document version. Returns `false` if no record has this id.
    ///
    /// Deleting the latest record re-elects the highest remaining version of
    /// the same type; with none left the type's metadata entry becomes `"0.0.0"`.
    pub async fn delete(store: &dyn KvStore, id: RecordId) -> Result<bool, StoreError> {
        let outcome = records::mutate_versioned(
            store,
            DOCUMENT_VERSIONS_KEY,
            Vec::new,
            |list: &mut Vec<DocumentVersion>| {
                let pos = list.iter().position(|d| d.id == id)?;
                let removed = list.remove(pos);
                let successor = settle_latest(list, removed.document_type, LatestChoice::Keep);
                Some((removed, successor, latest_by_type(list)))
            },
        )
        .await?;

        let Some(Versioned {
            value: (removed, successor, latest),
            revision,
        }) = outcome
        else {
            tracing::debug!(%id, "Delete of unknown document version ignored");
            return Ok(false);
        };

        MetadataRepo::sync(store, &[], &latest, revision).await?;

        tracing::info!(
            id = %removed.id,
            document_type = %removed.document_type,
            version = %removed.version,
            was_latest = removed.is_latest,
            successor = successor.as_deref().unwrap_or("none"),
            "Document version deleted",
        );
        Ok(true)
    }
}
