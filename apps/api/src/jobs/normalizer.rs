//! Job Normalizer: reconciles provider-shaped records into `CanonicalJob`.
//!
//! Each canonical field has a priority-ordered list of alternate keys. The first
//! key holding a usable value wins; otherwise the field's placeholder applies.
//! Normalization never fails.

use serde_json::Value;

use crate::models::job::{CanonicalJob, RawJobRecord};

pub const TITLE_KEYS: &[&str] = &["title", "jobTitle", "position"];
pub const COMPANY_KEYS: &[&str] = &["companyName", "company", "employer"];
pub const LOCATION_KEYS: &[&str] = &["location", "city"];
pub const URL_KEYS: &[&str] = &["url", "jobUrl", "applyUrl", "canonicalUrl"];
pub const SNIPPET_KEYS: &[&str] = &["description", "descriptionSnippet", "summary", "text"];
pub const SOURCE_KEYS: &[&str] = &["source", "jobSource"];

pub const UNTITLED_ROLE: &str = "Untitled role";
pub const COMPANY_PLACEHOLDER: &str = "Company N/A";
pub const LOCATION_PLACEHOLDER: &str = "Location N/A";

/// Maps one raw record to a `CanonicalJob`. `fallback_source` is used when the
/// record names no source of its own.
pub fn normalize(raw: &RawJobRecord, fallback_source: &str) -> CanonicalJob {
    CanonicalJob {
        title: resolve(raw, TITLE_KEYS).unwrap_or_else(|| UNTITLED_ROLE.to_string()),
        company: resolve(raw, COMPANY_KEYS).unwrap_or_else(|| COMPANY_PLACEHOLDER.to_string()),
        location: resolve(raw, LOCATION_KEYS).unwrap_or_else(|| LOCATION_PLACEHOLDER.to_string()),
        url: resolve(raw, URL_KEYS),
        snippet: resolve(raw, SNIPPET_KEYS).unwrap_or_default(),
        source: resolve(raw, SOURCE_KEYS).unwrap_or_else(|| fallback_source.to_string()),
        match_score: None,
        match_tips: None,
    }
}

/// Returns the first usable value among `keys`, in order.
fn resolve(raw: &RawJobRecord, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| raw.get(*key).and_then(coerce))
}

/// Strings and numbers are usable; anything else counts as absent.
fn coerce(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
