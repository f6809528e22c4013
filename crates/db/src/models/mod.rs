pub mod document_version;
pub mod metadata;
pub mod section_version;
