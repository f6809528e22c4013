//! Persistence for version metadata, document versions and section versions.
//!
//! All state lives in three JSON records in a key-value store (see [`keys`]).
//! Repositories take the store explicitly so tests can run against
//! [`kv::MemoryStore`].

pub mod keys;
pub mod kv;
pub mod models;
pub mod records;
pub mod repositories;
pub mod seed;
pub mod verify;

pub use kv::{connect, DbStore, KvStore, StoreConfig, StoreError};

/// Verify the store is reachable.
pub async fn health_check(store: &dyn KvStore) -> Result<(), StoreError> {
    store.ping().await
}
