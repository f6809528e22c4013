//! Semantic-version string helpers.
//!
//! Versions are plain dot-separated strings. Ordering compares numeric
//! components left to right; a missing or non-numeric component counts
//! as zero, so `"1.2"` equals `"1.2.0"` and `"1.10.0"` sorts after `"1.2.10"`.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Version assigned to a freshly initialised metadata record.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Sentinel stored in `latestVersions` when a document type has no versions.
pub const NO_VERSION: &str = "0.0.0";

static STRICT_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid regex"));

fn components(version: &str) -> Vec<u64> {
    version
        .split('.')
        .map(|part| part.trim().parse::<u64>().unwrap_or(0))
        .collect()
}

/// Compare two version strings component by component, zero-padding the shorter.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a, b) = (components(a), components(b));
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Sort versions ascending by [`compare_versions`]. The sort is stable.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// Index of the highest version in `versions`.
///
/// Among equal versions the earliest one wins.
pub fn highest_index<'a, I>(versions: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(usize, &str)> = None;
    for (i, v) in versions.into_iter().enumerate() {
        match best {
            Some((_, current)) if compare_versions(v, current) != Ordering::Greater => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// `true` if `version` is exactly `MAJOR.MINOR.PATCH` with numeric parts.
pub fn is_strict_version(version: &str) -> bool {
    STRICT_VERSION_RE.is_match(version)
}

/// Reject anything that is not a strict `MAJOR.MINOR.PATCH` string.
pub fn validate_version(version: &str) -> Result<(), CoreError> {
    if !is_strict_version(version) {
        return Err(CoreError::Validation(format!(
            "Invalid version '{version}'. Expected format MAJOR.MINOR.PATCH"
        )));
    }
    Ok(())
}
