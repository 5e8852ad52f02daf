//! Résumé matching: pluggable matcher that scores a résumé against one job.
//!
//! Default: `LlmResumeMatcher` (asks the model for a JSON verdict).
//! `AppState` holds an `Arc<dyn ResumeMatcher>`; tests swap in fakes.

pub mod orchestrator;
pub mod prompts;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::llm_client::{strip_json_fences, LlmError, TextCompleter};
use crate::matching::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};

/// Only this much of the résumé is embedded in a match prompt.
pub const RESUME_PROMPT_CHARS: usize = 2000;

const UNPARSED_TIP: &str = "Could not analyze match details.";

// ────────────────────────────────────────────────────────────────────────────
// Output data model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub percentage: u8, // 0 to 100
    pub tips: Vec<String>,
}

impl MatchResult {
    /// Result used when the model's answer cannot be read.
    pub fn unparsed() -> Self {
        Self {
            percentage: 0,
            tips: vec![UNPARSED_TIP.to_string()],
        }
    }

    /// Builds a result from loosely-typed JSON. Missing or odd fields take
    /// their defaults instead of failing.
    pub fn from_value(value: &Value) -> Self {
        let percentage = value.get("percentage").map(coerce_percentage).unwrap_or(0);

        let tips = value
            .get("tips")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self { percentage, tips }
    }
}

fn coerce_percentage(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    raw.filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
        .unwrap_or(0)
}

/// Parses a matcher reply, tolerating code fences. Never fails: unreadable
/// replies become `MatchResult::unparsed()`.
pub fn parse_match_response(text: &str) -> MatchResult {
    match serde_json::from_str::<Value>(strip_json_fences(text)) {
        Ok(value) if value.is_object() => MatchResult::from_value(&value),
        Ok(other) => {
            warn!("Match response was JSON but not an object: {other}");
            MatchResult::unparsed()
        }
        Err(e) => {
            warn!("Could not parse match response: {e}");
            MatchResult::unparsed()
        }
    }
}

/// Returns at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores a résumé against a single job. Errors are per-job and never abort a
/// batch; see `orchestrator::score_jobs`.
#[async_trait]
pub trait ResumeMatcher: Send + Sync {
    async fn match_resume(
        &self,
        resume_text: &str,
        job_title: &str,
        job_snippet: &str,
    ) -> Result<MatchResult, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmResumeMatcher: default implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmResumeMatcher(pub Arc<dyn TextCompleter>);

#[async_trait]
impl ResumeMatcher for LlmResumeMatcher {
    async fn match_resume(
        &self,
        resume_text: &str,
        job_title: &str,
        job_snippet: &str,
    ) -> Result<MatchResult, LlmError> {
        let prompt = build_match_prompt(resume_text, job_title, job_snippet);
        let reply = self.0.complete(&prompt, MATCH_SYSTEM).await?;
        Ok(parse_match_response(&reply))
    }
}

fn build_match_prompt(resume_text: &str, job_title: &str, job_snippet: &str) -> String {
    let snippet = if job_snippet.trim().is_empty() {
        "(no description provided)"
    } else {
        job_snippet
    };
    MATCH_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{job_snippet}", snippet)
        .replace("{resume_text}", truncate_chars(resume_text, RESUME_PROMPT_CHARS))
}
