//! Key-value store abstraction.
//!
//! Every persisted record is a JSON blob under a single key. Each key carries
//! a revision counter so writers can use [`KvStore::compare_and_set`] instead
//! of blind overwrites.

mod memory;
mod rest;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use memory::MemoryStore;
pub use rest::RestStore;

/// Default timeout for a single request to a remote store.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A value read from the store together with the revision it was read at.
///
/// Absent keys are at revision `0`; every successful write bumps the revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub value: T,
    pub revision: u64,
}

/// Errors from the key-value store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached (network, timeout, 5xx).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A conditional write lost against a concurrent writer.
    #[error("Concurrent modification of '{key}'")]
    Conflict { key: String },

    /// A stored blob could not be encoded or decoded.
    #[error("Malformed record under '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The store answered with something we do not understand.
    #[error("Store protocol error: {0}")]
    Protocol(String),
}

/// Shared handle to a store backend.
pub type DbStore = Arc<dyn KvStore>;

/// Minimal key-value interface the repositories are written against.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a raw value and its revision. `None` if the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Versioned<String>>, StoreError>;

    /// Unconditionally write a value. Returns the new revision.
    async fn set(&self, key: &str, value: &str) -> Result<u64, StoreError>;

    /// Write a value only if the key is still at `expected_revision`.
    ///
    /// Returns the new revision, or [`StoreError::Conflict`] if another
    /// writer got there first.
    async fn compare_and_set(
        &self,
        key: &str,
        value: &str,
        expected_revision: u64,
    ) -> Result<u64, StoreError>;

    /// Connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Which backend to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local map. Data does not survive a restart.
    Memory,
    /// Redis-compatible REST endpoint (Upstash / Vercel KV).
    Rest { url: String, token: String },
}

/// Store connection settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Per-request timeout for remote backends.
    pub timeout: Duration,
}

impl StoreConfig {
    /// Load store settings from environment variables.
    ///
    /// | Env Var             | Default                                      |
    /// |---------------------|----------------------------------------------|
    /// | `KV_BACKEND`        | `rest` if `KV_REST_API_URL` is set, else `memory` |
    /// | `KV_REST_API_URL`   | required for `rest`                          |
    /// | `KV_REST_API_TOKEN` | required for `rest`                          |
    /// | `KV_TIMEOUT_SECS`   | `10`                                         |
    pub fn from_env() -> Result<Self, StoreError> {
        let url = std::env::var("KV_REST_API_URL").ok();
        let token = std::env::var("KV_REST_API_TOKEN").ok();

        let default_backend = if url.is_some() { "rest" } else { "memory" };
        let backend_name =
            std::env::var("KV_BACKEND").unwrap_or_else(|_| default_backend.to_string());

        let backend = match backend_name.as_str() {
            "memory" => {
                tracing::warn!("Using in-memory key-value store; data will not persist");
                StoreBackend::Memory
            }
            "rest" => {
                let url = url.ok_or_else(|| {
                    StoreError::Protocol("KV_REST_API_URL must be set for the rest backend".into())
                })?;
                let token = token.ok_or_else(|| {
                    StoreError::Protocol(
                        "KV_REST_API_TOKEN must be set for the rest backend".into(),
                    )
                })?;
                StoreBackend::Rest { url, token }
            }
            other => {
                return Err(StoreError::Protocol(format!(
                    "Unknown KV_BACKEND '{other}'. Expected 'memory' or 'rest'"
                )))
            }
        };

        let timeout_secs = std::env::var("KV_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            backend,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Build a store handle for the configured backend.
pub fn connect(config: &StoreConfig) -> Result<DbStore, StoreError> {
    match &config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Rest { url, token } => Ok(Arc::new(RestStore::new(
            url.clone(),
            token.clone(),
            config.timeout,
        )?)),
    }
}
