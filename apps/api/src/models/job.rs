use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A provider-shaped job record. No fixed schema; keys vary per provider and
/// sometimes per record.
pub type RawJobRecord = Map<String, Value>;

/// The one job shape every provider is reconciled into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalJob {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub snippet: String,
    pub source: String,
    /// 0 to 100, set only after a successful résumé match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_tips: Option<Vec<String>>,
}
