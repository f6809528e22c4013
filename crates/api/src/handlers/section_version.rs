//! Handlers for the `/api/versions/section` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use validator::Validate;
use veritas_core::error::CoreError;
use veritas_core::types::RecordId;
use veritas_core::version::validate_version;
use veritas_db::models::section_version::{
    CreateSectionVersion, SectionVersion, UpdateSectionVersion,
};
use veritas_db::repositories::SectionVersionRepo;

use super::{decode_body, require_fields};
use crate::error::{AppError, AppResult};
use crate::middleware::api_key::RequireApiKey;
use crate::query::SectionListParams;
use crate::state::AppState;

const REQUIRED_FIELDS: &[&str] = &[
    "sectionId",
    "title",
    "path",
    "version",
    "lastUpdated",
    "documentTypes",
    "tags",
];

fn not_found(id: RecordId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "SectionVersion",
        id,
    })
}

/// GET /api/versions/section[?version=]
///
/// `version`, when given, must be `MAJOR.MINOR.PATCH`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SectionListParams>,
) -> AppResult<Json<Vec<SectionVersion>>> {
    let store = state.store.as_ref();
    let sections = match params.version.as_deref() {
        Some(version) => {
            validate_version(version)?;
            SectionVersionRepo::list_by_version(store, version).await?
        }
        None => SectionVersionRepo::list(store).await?,
    };
    Ok(Json(sections))
}

/// GET /api/versions/section/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<SectionVersion>> {
    let section = SectionVersionRepo::find_by_id(state.store.as_ref(), id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(section))
}

/// POST /api/versions/section
pub async fn create(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<SectionVersion>)> {
    require_fields(&body, REQUIRED_FIELDS)?;
    let input: CreateSectionVersion = decode_body(body)?;
    input.validate()?;

    let created = SectionVersionRepo::create(state.store.as_ref(), &input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/versions/section/{id}
pub async fn update(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(body): Json<Value>,
) -> AppResult<Json<SectionVersion>> {
    let patch: UpdateSectionVersion = decode_body(body)?;
    patch.validate()?;

    let updated = SectionVersionRepo::update(state.store.as_ref(), id, &patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(updated))
}

/// DELETE /api/versions/section/{id}
pub async fn delete(
    _auth: RequireApiKey,
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    if SectionVersionRepo::delete(state.store.as_ref(), id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
