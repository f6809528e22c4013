//! Repository for the `section:versions` list.

use uuid::Uuid;
use veritas_core::types::RecordId;

use crate::keys::SECTION_VERSIONS_KEY;
use crate::kv::{KvStore, StoreError};
use crate::models::section_version::{CreateSectionVersion, SectionVersion, UpdateSectionVersion};
use crate::records;

/// Plain CRUD over section versions. No metadata side effects.
pub struct SectionVersionRepo;

impl SectionVersionRepo {
    pub async fn list(store: &dyn KvStore) -> Result<Vec<SectionVersion>, StoreError> {
        records::load_or_default(store, SECTION_VERSIONS_KEY).await
    }

    /// Sections recorded at exactly `version`.
    pub async fn list_by_version(
        store: &dyn KvStore,
        version: &str,
    ) -> Result<Vec<SectionVersion>, StoreError> {
        let mut list = Self::list(store).await?;
        list.retain(|s| s.version == version);
        Ok(list)
    }

    pub async fn find_by_id(
        store: &dyn KvStore,
        id: RecordId,
    ) -> Result<Option<SectionVersion>, StoreError> {
        Ok(Self::list(store).await?.into_iter().find(|s| s.id == id))
    }

    pub async fn create(
        store: &dyn KvStore,
        input: &CreateSectionVersion,
    ) -> Result<SectionVersion, StoreError> {
        let section = SectionVersion::from_input(Uuid::new_v4(), input);

        records::mutate(
            store,
            SECTION_VERSIONS_KEY,
            Vec::new,
            |list: &mut Vec<SectionVersion>| {
                list.push(section.clone());
                Some(())
            },
        )
        .await?;

        tracing::info!(
            id = %section.id,
            section_id = %section.section_id,
            version = %section.version,
            "Section version created",
        );
        Ok(section)
    }

    /// Apply a partial update. Returns `None` if no record has this id.
    pub async fn update(
        store: &dyn KvStore,
        id: RecordId,
        patch: &UpdateSectionVersion,
    ) -> Result<Option<SectionVersion>, StoreError> {
        let updated = records::mutate(
            store,
            SECTION_VERSIONS_KEY,
            Vec::new,
            |list: &mut Vec<SectionVersion>| {
                let section = list.iter_mut().find(|s| s.id == id)?;
                section.apply(patch);
                Some(section.clone())
            },
        )
        .await?;

        if let Some(s) = &updated {
            tracing::info!(id = %s.id, section_id = %s.section_id, "Section version updated");
        }
        Ok(updated)
    }

    /// Delete a section version. Returns `false` if no record has this id.
    pub async fn delete(store: &dyn KvStore, id: RecordId) -> Result<bool, StoreError> {
        let removed = records::mutate(
            store,
            SECTION_VERSIONS_KEY,
            Vec::new,
            |list: &mut Vec<SectionVersion>| {
                let pos = list.iter().position(|s| s.id == id)?;
                Some(list.remove(pos))
            },
        )
        .await?;

        match removed {
            Some(s) => {
                tracing::info!(id = %s.id, section_id = %s.section_id, "Section version deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
