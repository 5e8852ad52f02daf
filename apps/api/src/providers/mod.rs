//! Job providers: one adapter per job source.
//!
//! The aggregator only ever sees `JobProvider`; scraping details stay inside
//! each adapter.

pub mod demo;
pub mod linkedin;
pub mod workday;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::models::job::RawJobRecord;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A job source. `fetch` returns records in the provider's own order and shape.
#[async_trait]
pub trait JobProvider: Send + Sync {
    /// Stable lowercase id used in search requests, e.g. `linkedin`.
    fn id(&self) -> &str;

    async fn fetch(&self, query: &str, location: &str, rows: u32) -> Result<Vec<RawJobRecord>>;
}

/// Human-facing name derived from a provider id: first letter upper, rest lower.
pub fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
}

/// Registered providers, in the order they are offered and queried by default.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn JobProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: Arc<dyn JobProvider>) -> Self {
        self.providers.retain(|p| p.id() != provider.id());
        self.providers.push(provider);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn JobProvider>> {
        self.providers.iter().find(|p| p.id() == id)
    }

    pub fn ids(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.id().to_string()).collect()
    }

    pub fn info(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|p| ProviderInfo {
                id: p.id().to_string(),
                name: display_name(p.id()),
            })
            .collect()
    }
}

/// Resolves a live fetch against the demo fallback setting.
///
/// With the fallback off the outcome passes through untouched, errors
/// included. With it on, an error or an empty result is replaced by `demo()`.
pub fn with_fallback(
    provider: &str,
    outcome: Result<Vec<RawJobRecord>>,
    demo_fallback: bool,
    demo: impl FnOnce() -> Vec<RawJobRecord>,
) -> Result<Vec<RawJobRecord>> {
    if !demo_fallback {
        return outcome;
    }
    match outcome {
        Ok(jobs) if !jobs.is_empty() => Ok(jobs),
        Ok(_) => {
            warn!("{provider} returned no jobs, serving demo listings");
            Ok(demo())
        }
        Err(e) => {
            warn!("{provider} search error, serving demo listings: {e:#}");
            Ok(demo())
        }
    }
}

/// Builds the HTTP client shared by the scraping adapters.
pub fn build_http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    Ok(client)
}
