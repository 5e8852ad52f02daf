//! Fakes for the search workflow's collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::config::Config;
use crate::llm_client::{LlmError, TextCompleter};
use crate::matching::{MatchResult, ResumeMatcher};
use crate::models::job::RawJobRecord;
use crate::providers::{JobProvider, ProviderRegistry};
use crate::resume::{ExtractionError, ResumeExtractor};
use crate::state::AppState;

pub struct FakeProvider {
    id: &'static str,
    records: Vec<Value>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(id: &'static str, records: Vec<Value>) -> Self {
        Self {
            id,
            records,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(id: &'static str) -> Self {
        Self {
            fail: true,
            ..Self::new(id, vec![])
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobProvider for FakeProvider {
    fn id(&self) -> &str {
        self.id
    }

    async fn fetch(&self, _: &str, _: &str, _: u32) -> Result<Vec<RawJobRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("site unreachable"));
        }
        Ok(self
            .records
            .iter()
            .filter_map(|v| v.as_object().cloned())
            .collect())
    }
}

/// Returns a fixed summary, or fails when `fail` is set.
pub struct FakeCompleter {
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeCompleter {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TextCompleter for FakeCompleter {
    async fn complete(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LlmError::RateLimited { retries: 3 });
        }
        Ok("- SQL\n- Python".to_string())
    }
}

/// Gives every job 70% with one tip.
pub struct FakeMatcher {
    pub calls: AtomicUsize,
}

impl FakeMatcher {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ResumeMatcher for FakeMatcher {
    async fn match_resume(
        &self,
        _resume_text: &str,
        _job_title: &str,
        _job_snippet: &str,
    ) -> Result<MatchResult, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(MatchResult {
            percentage: 70,
            tips: vec!["Mention SQL".to_string()],
        })
    }
}

/// Returns the upload's bytes as UTF-8 text; fails on the literal `broken`.
pub struct FakeExtractor;

#[async_trait]
impl ResumeExtractor for FakeExtractor {
    async fn extract(&self, document: Bytes) -> Result<String, ExtractionError> {
        if document.as_ref() == b"broken" {
            return Err(ExtractionError::Pdf("Invalid file header".to_string()));
        }
        Ok(String::from_utf8_lossy(&document).into_owned())
    }
}

pub fn test_config() -> Config {
    Config {
        anthropic_api_key: "test-key".to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        provider_timeout_secs: 5,
        match_concurrency: 4,
        max_upload_bytes: 1024 * 1024,
        demo_fallback: false,
    }
}

pub fn test_state(
    providers: ProviderRegistry,
    llm: Arc<FakeCompleter>,
    matcher: Arc<FakeMatcher>,
) -> AppState {
    AppState {
        config: test_config(),
        providers,
        llm,
        matcher,
        extractor: Arc::new(FakeExtractor),
    }
}
