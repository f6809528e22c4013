//! Typed JSON records on top of [`KvStore`].
//!
//! Each top-level record (metadata, document list, section list) is one JSON
//! blob. Writers go through [`mutate`], which retries the read-modify-write
//! cycle when a concurrent writer bumps the revision underneath it.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::kv::{KvStore, StoreError, Versioned};

/// Maximum read-modify-write attempts before a conflict is surfaced.
pub const MAX_CAS_ATTEMPTS: usize = 5;

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|source| StoreError::Serialization {
        key: key.to_string(),
        source,
    })
}

/// Read and decode a record. `None` if the key was never written.
pub async fn load<T: DeserializeOwned>(
    store: &dyn KvStore,
    key: &str,
) -> Result<Option<Versioned<T>>, StoreError> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(Versioned {
            value: decode(key, &raw.value)?,
            revision: raw.revision,
        })),
        None => Ok(None),
    }
}

/// Read a list-shaped record, treating an absent key as empty.
pub async fn load_or_default<T: DeserializeOwned + Default>(
    store: &dyn KvStore,
    key: &str,
) -> Result<T, StoreError> {
    Ok(load(store, key).await?.map(|v| v.value).unwrap_or_default())
}

/// Overwrite a record unconditionally. Returns the new revision.
pub async fn save<T: Serialize>(store: &dyn KvStore, key: &str, value: &T) -> Result<u64, StoreError> {
    store.set(key, &encode(key, value)?).await
}

/// Write a record only if it is still at `expected_revision`.
pub async fn save_if<T: Serialize>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
    expected_revision: u64,
) -> Result<u64, StoreError> {
    store
        .compare_and_set(key, &encode(key, value)?, expected_revision)
        .await
}

/// Optimistic read-modify-write of a single record.
///
/// Reads the record (or `init()` when absent), applies `f`, and writes it back
/// conditionally on the revision that was read. If another writer changed the
/// record in between, the cycle starts over with fresh data, up to
/// [`MAX_CAS_ATTEMPTS`] times.
///
/// `f` returning `None` means "nothing to change": no write happens and
/// `Ok(None)` is returned. `f` may run more than once, so it must not have
/// side effects outside the record.
pub async fn mutate<T, R, I, F>(
    store: &dyn KvStore,
    key: &str,
    init: I,
    f: F,
) -> Result<Option<R>, StoreError>
where
    T: Serialize + DeserializeOwned,
    I: Fn() -> T,
    F: FnMut(&mut T) -> Option<R>,
{
    Ok(mutate_versioned(store, key, init, f)
        .await?
        .map(|written| written.value))
}

/// [`mutate`], also returning the revision the record was written at.
pub async fn mutate_versioned<T, R, I, F>(
    store: &dyn KvStore,
    key: &str,
    init: I,
    mut f: F,
) -> Result<Option<Versioned<R>>, StoreError>
where
    T: Serialize + DeserializeOwned,
    I: Fn() -> T,
    F: FnMut(&mut T) -> Option<R>,
{
    for attempt in 1..=MAX_CAS_ATTEMPTS {
        let (mut value, revision) = match load::<T>(store, key).await? {
            Some(v) => (v.value, v.revision),
            None => (init(), 0),
        };

        let Some(result) = f(&mut value) else {
            return Ok(None);
        };

        match save_if(store, key, &value, revision).await {
            Ok(revision) => {
                return Ok(Some(Versioned {
                    value: result,
                    revision,
                }));
            }
            Err(StoreError::Conflict { .. }) if attempt < MAX_CAS_ATTEMPTS => {
                tracing::debug!(key, attempt, "Record changed during update, retrying");
            }
            Err(e) => return Err(e),
        }
    }

    Err(StoreError::Conflict {
        key: key.to_string(),
    })
}
