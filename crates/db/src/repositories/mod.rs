//! Repositories over the three top-level records.
//!
//! Each repository is a zero-sized struct whose async methods take the store
//! handle explicitly.

pub mod document_version_repo;
pub mod metadata_repo;
pub mod section_version_repo;

pub use document_version_repo::DocumentVersionRepo;
pub use metadata_repo::MetadataRepo;
pub use section_version_repo::SectionVersionRepo;
