//! Request extractors guarding write endpoints.
//!
//! - [`api_key::RequireApiKey`] -- Requires a valid `x-api-key` header.

pub mod api_key;
