//! Handler for the version metadata record.

use axum::extract::State;
use axum::Json;
use veritas_db::models::metadata::VersionMetadata;
use veritas_db::repositories::MetadataRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/versions
///
/// Returns the metadata record, initialising the default one on first read.
pub async fn get_metadata(State(state): State<AppState>) -> AppResult<Json<VersionMetadata>> {
    let metadata = MetadataRepo::get(state.store.as_ref()).await?;
    Ok(Json(metadata))
}
