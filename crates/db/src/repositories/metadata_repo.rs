//! Repository for the `version:metadata` record.

use chrono::Utc;
use veritas_core::document_type::DocumentType;

use crate::keys::METADATA_KEY;
use crate::kv::{KvStore, StoreError};
use crate::models::metadata::VersionMetadata;
use crate::records;

/// Reads and writes the singleton metadata record.
pub struct MetadataRepo;

impl MetadataRepo {
    /// Return the current metadata, creating the default record if none exists.
    ///
    /// A store failure is returned as an error rather than masked by an
    /// in-memory default.
    pub async fn get(store: &dyn KvStore) -> Result<VersionMetadata, StoreError> {
        if let Some(existing) = records::load::<VersionMetadata>(store, METADATA_KEY).await? {
            return Ok(existing.value);
        }

        let initial = VersionMetadata::initial(Utc::now());
        match records::save_if(store, METADATA_KEY, &initial, 0).await {
            Ok(_) => {
                tracing::info!("Initialised default version metadata");
                Ok(initial)
            }
            // Someone else initialised it first; theirs wins.
            Err(StoreError::Conflict { .. }) => records::load(store, METADATA_KEY)
                .await?
                .map(|v| v.value)
                .ok_or_else(|| StoreError::Protocol("metadata vanished after conflict".into())),
            Err(e) => Err(e),
        }
    }

    /// Overwrite the whole metadata record. Last writer wins.
    pub async fn update(store: &dyn KvStore, metadata: &VersionMetadata) -> Result<(), StoreError> {
        records::save(store, METADATA_KEY, metadata).await?;
        tracing::info!(
            current_version = %metadata.current_version,
            versions = metadata.versions.len(),
            "Version metadata replaced",
        );
        Ok(())
    }

    /// Register `versions` and adopt the latest versions seen in the
    /// document list at `list_revision`.
    ///
    /// Used by the document-version repository after every list write. When
    /// no metadata exists yet the record is built from scratch rather than
    /// from the `1.0.0` default, so it only names versions that were written.
    /// A list view older than the one the metadata already reflects only
    /// registers its versions.
    pub(crate) async fn sync(
        store: &dyn KvStore,
        versions: &[String],
        latest: &[(DocumentType, Option<String>)],
        list_revision: u64,
    ) -> Result<VersionMetadata, StoreError> {
        let now = Utc::now();
        let updated = records::mutate(
            store,
            METADATA_KEY,
            VersionMetadata::empty,
            |meta: &mut VersionMetadata| {
                for v in versions {
                    meta.register_version(v, now);
                }
                let applied = meta.apply_latest(list_revision, latest);
                Some((meta.clone(), applied))
            },
        )
        .await?;

        let (meta, applied) = updated
            .ok_or_else(|| StoreError::Protocol("metadata update produced no record".into()))?;
        if !applied {
            tracing::debug!(
                list_revision,
                documents_revision = meta.documents_revision,
                "Metadata already reflects a newer document list",
            );
        }
        Ok(meta)
    }
}
