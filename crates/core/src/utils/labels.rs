//! Label normalization for user-typed classification strings.
//!
//! Countries, sectors and theses arrive typed by users, so case and
//! whitespace variants of the same label must collapse into one bucket.
//! Every ingestion point (aggregation keys, builder weight lookups) goes
//! through these functions before a label is used as a map key.

use crate::constants::EMPTY_LABEL_SENTINEL;

/// Normalizes a raw label: trimmed and lowercased.
///
/// Returns an empty string for blank input or the "no label" sentinel, so
/// callers can substitute their dimension's fallback bucket.
pub fn normalize_label(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == EMPTY_LABEL_SENTINEL {
        return String::new();
    }
    trimmed.to_lowercase()
}

/// Normalizes a raw label, mapping blank/sentinel input to `fallback`.
pub fn normalize_or(raw: &str, fallback: &str) -> String {
    let normalized = normalize_label(raw);
    if normalized.is_empty() {
        fallback.to_string()
    } else {
        normalized
    }
}
