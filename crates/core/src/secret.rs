//! Shared-secret comparison for write endpoints.
//!
//! Both sides are hashed before comparing so the comparison always runs over
//! two 32-byte digests. A length mismatch between the provided and expected
//! secrets therefore cannot short-circuit.

use crate::hashing::sha256;

/// Compare two secrets without data-dependent early exit.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let a = sha256(provided.as_bytes());
    let b = sha256(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Check a caller-provided key against the configured one.
///
/// Rejects when either side is missing or empty.
pub fn verify_api_key(provided: Option<&str>, expected: Option<&str>) -> bool {
    match (provided, expected) {
        (Some(p), Some(e)) if !p.is_empty() && !e.is_empty() => secrets_match(p, e),
        _ => false,
    }
}
