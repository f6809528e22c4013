pub mod document_version;
pub mod metadata;
pub mod section_version;

use serde::de::DeserializeOwned;
use serde_json::Value;
use veritas_core::fields::missing_fields;

use crate::error::{AppError, AppResult};

/// Reject `body` with a list of absent fields, if any are absent.
pub(crate) fn require_fields(body: &Value, required: &[&'static str]) -> AppResult<()> {
    let missing = missing_fields(body, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingFields(missing))
    }
}

/// Decode a loosely typed JSON body into a DTO, mapping type errors to 400.
pub(crate) fn decode_body<T: DeserializeOwned>(body: Value) -> AppResult<T> {
    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}
