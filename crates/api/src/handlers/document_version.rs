//! Handlers for the `/api/versions/document` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde_json::Value;
use validator::Validate;
use veritas_core::document_type::DocumentType;
use veritas_core::error::CoreError;
use veritas_core::types::RecordId;
use veritas_db::models::document_version::{
    CreateDocumentVersion, DocumentVersion, UpdateDocumentVersion,
};
use veritas_db::repositories::DocumentVersionRepo;

use super::{decode_body, require_fields};
use crate::error::{AppError, AppResult};
use crate::middleware::api_key::RequireApiKey;
use crate::query::DocumentListParams;
use crate::state::AppState;

/// Fields a create request must carry. `releaseDate` is stamped by the server.
const REQUIRED_FIELDS: &[&str] = &[
    "version",
    "documentType",
    "title",
    "description",
    "isLatest",
    "changelog",
    "sections",
];

fn not_found(id: RecordId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "DocumentVersion",
        id,
    })
}

/// GET /api/versions/document[?type=]
///
/// All document versions, or those of one type. Unknown types are a 400.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> AppResult<Json<Vec<DocumentVersion>>> {
    let store = state.store.as_ref();
    let versions = match params.doc_type.as_deref() {
        Some(raw) => {
            let doc_type: DocumentType = raw.parse()?;
            DocumentVersionRepo::list_by_type(store, doc_type).await?
        }
        None => DocumentVersionRepo::list(store).await?,
    };
    Ok(Json(versions))
}

/// GET /api/versions/document/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<DocumentVersion>> {
    let version = DocumentVersionRepo::find_by_id(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(version))
}

/// POST /api/versions/document
///
/// Creates a version. If it is flagged latest, every other version of the same
/// type is demoted and the metadata record is updated.
pub async fn create(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DocumentVersion>)> {
    require_fields(&body, REQUIRED_FIELDS)?;
    let mut input: CreateDocumentVersion = decode_body(body)?;
    input.validate()?;
    input.release_date = Utc::now();

    let created = DocumentVersionRepo::create(state.store.as_ref(), &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/versions/document/{id}
///
/// Partial update: only the fields present in the body are changed.
pub async fn update(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(body): Json<Value>,
) -> AppResult<Json<DocumentVersion>> {
    let patch: UpdateDocumentVersion = decode_body(body)?;
    patch.validate()?;

    let updated = DocumentVersionRepo::update(state.store.as_ref(), id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(updated))
}

/// DELETE /api/versions/document/{id}
///
/// Deleting the latest version re-elects the highest remaining one.
pub async fn delete(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    if DocumentVersionRepo::delete(state.store.as_ref(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
