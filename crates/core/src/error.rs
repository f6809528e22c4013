use crate::types::RecordId;

/// Domain errors shared by the store and HTTP layers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Concurrent writers kept changing a record until retries ran out.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
