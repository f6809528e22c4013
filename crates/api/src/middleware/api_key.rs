//! Shared-secret extractor for write endpoints.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use veritas_core::error::CoreError;
use veritas_core::secret::verify_api_key;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request carried the configured `x-api-key`.
///
/// Add it as an extractor parameter to any handler that mutates state:
///
/// ```ignore
/// async fn create(_auth: RequireApiKey, State(state): State<AppState>) -> AppResult<()> {
///     Ok(())
/// }
/// ```
///
/// A missing header, an unconfigured server key and a wrong key are all
/// rejected with the same 401 so callers cannot tell them apart.
#[derive(Debug, Clone, Copy)]
pub struct RequireApiKey;

impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        if verify_api_key(provided, state.config.api_key.as_deref()) {
            Ok(RequireApiKey)
        } else {
            tracing::warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                header_present = provided.is_some(),
                "Rejected write without a valid API key",
            );
            Err(AppError::Core(CoreError::Unauthorized(
                "Missing or invalid API key".into(),
            )))
        }
    }
}
