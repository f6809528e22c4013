use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: both fields are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Key-value store holding the three version records.
    pub store: veritas_db::DbStore,
    /// Server configuration (read by the API key extractor).
    pub config: Arc<ServerConfig>,
}
