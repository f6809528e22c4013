//! Top-level keys in the key-value store.

/// The singleton [`VersionMetadata`](crate::models::metadata::VersionMetadata) record.
pub const METADATA_KEY: &str = "version:metadata";

/// The list of all [`DocumentVersion`](crate::models::document_version::DocumentVersion) records.
pub const DOCUMENT_VERSIONS_KEY: &str = "document:versions";

/// The list of all [`SectionVersion`](crate::models::section_version::SectionVersion) records.
pub const SECTION_VERSIONS_KEY: &str = "section:versions";

/// Every key the service owns.
pub const ALL_KEYS: [&str; 3] = [METADATA_KEY, DOCUMENT_VERSIONS_KEY, SECTION_VERSIONS_KEY];
