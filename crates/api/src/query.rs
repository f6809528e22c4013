//! Query parameter types for the list endpoints.

use serde::Deserialize;

/// `GET /api/versions/document?type=`
#[derive(Debug, Deserialize)]
pub struct DocumentListParams {
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
}

/// `GET /api/versions/section?version=`
#[derive(Debug, Deserialize)]
pub struct SectionListParams {
    pub version: Option<String>,
}
