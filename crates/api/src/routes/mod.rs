pub mod health;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /versions                                 metadata
/// /versions/document[/{id}]                 document versions
/// /versions/section[/{id}]                  section versions
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/versions", versions::router())
}
