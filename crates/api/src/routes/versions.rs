use axum::routing::get;
use axum::Router;

use crate::handlers::{document_version, metadata, section_version};
use crate::state::AppState;

/// Routes mounted at `/versions`.
///
/// ```text
/// GET                 /                 version metadata
/// GET, POST           /document         list (?type=), create
/// GET, PUT, DELETE    /document/{id}    get, update, delete
/// GET, POST           /section          list (?version=), create
/// GET, PUT, DELETE    /section/{id}     get, update, delete
/// ```
///
/// Writes require the `x-api-key` header. Any other method is a 405.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(metadata::get_metadata))
        .route(
            "/document",
            get(document_version::list).post(document_version::create),
        )
        .route(
            "/document/{id}",
            get(document_version::get_by_id)
                .put(document_version::update)
                .delete(document_version::delete),
        )
        .route(
            "/section",
            get(section_version::list).post(section_version::create),
        )
        .route(
            "/section/{id}",
            get(section_version::get_by_id)
                .put(section_version::update)
                .delete(section_version::delete),
        )
}
