//! In-process store backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{KvStore, StoreError, Versioned};

/// A [`KvStore`] backed by a `HashMap`.
///
/// Used for tests and local development. [`MemoryStore::set_available`]
/// simulates an outage so callers can exercise their unavailable paths.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Versioned<String>>>,
    available: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle simulated connectivity. While unavailable every call fails
    /// with [`StoreError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".into()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Versioned<String>>, StoreError> {
        self.check_available()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<u64, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let revision = entries.get(key).map_or(0, |e| e.revision) + 1;
        entries.insert(
            key.to_string(),
            Versioned {
                value: value.to_string(),
                revision,
            },
        );
        Ok(revision)
    }

    async fn compare_and_set(
        &self,
        key: &str,
        value: &str,
        expected_revision: u64,
    ) -> Result<u64, StoreError> {
        self.check_available()?;
        let mut entries = self.entries.write().await;
        let current = entries.get(key).map_or(0, |e| e.revision);
        if current != expected_revision {
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }
        let revision = current + 1;
        entries.insert(
            key.to_string(),
            Versioned {
                value: value.to_string(),
                revision,
            },
        );
        Ok(revision)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
