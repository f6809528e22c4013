//! Domain vocabulary shared by the VeritasVault version service.
//!
//! This crate has no I/O and no internal dependencies so the store layer,
//! the HTTP server and the CLI tools can all build on it.

pub mod document_type;
pub mod error;
pub mod fields;
pub mod hashing;
pub mod secret;
pub mod types;
pub mod version;
