//! Aggregator: fans a search out to the requested providers and merges the
//! normalized results provider-major.
//!
//! Fetches run concurrently but results are re-sequenced into request order
//! before flattening. A failing or slow provider costs only its own jobs.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::jobs::normalizer::normalize;
use crate::models::job::CanonicalJob;
use crate::providers::{display_name, ProviderRegistry};

/// One provider's failure, kept so the caller can surface it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceError {
    pub provider_id: String,
    pub provider_name: String,
    pub message: String,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} search failed: {}", self.provider_name, self.message)
    }
}

#[derive(Debug, Default)]
pub struct Aggregation {
    pub jobs: Vec<CanonicalJob>,
    pub errors: Vec<SourceError>,
}

/// Parameters for a single aggregation run.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    pub query: &'a str,
    pub location: &'a str,
    /// Soft hint forwarded to each provider; the merged list is not truncated.
    pub rows: u32,
}

pub async fn aggregate(
    search: SearchQuery<'_>,
    sources: &[String],
    registry: &ProviderRegistry,
    timeout: Duration,
) -> Aggregation {
    let mut seen = HashSet::new();
    let providers: Vec<_> = sources
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .filter_map(|id| match registry.get(id) {
            Some(provider) => Some(provider.clone()),
            None => {
                debug!("Skipping unknown provider id '{id}'");
                None
            }
        })
        .collect();

    let fetches = providers.iter().map(|provider| async move {
        let outcome = tokio::time::timeout(
            timeout,
            provider.fetch(search.query, search.location, search.rows),
        )
        .await;
        (provider.id(), outcome)
    });

    // join_all yields in input order regardless of completion order.
    let results = join_all(fetches).await;

    let mut aggregation = Aggregation::default();

    for (id, outcome) in results {
        let name = display_name(id);
        let message = match outcome {
            Ok(Ok(raw_jobs)) => {
                info!("{} returned {} jobs", name, raw_jobs.len());
                aggregation
                    .jobs
                    .extend(raw_jobs.iter().map(|raw| normalize(raw, &name)));
                continue;
            }
            Ok(Err(e)) => format!("{e:#}"),
            Err(_) => format!("timed out after {timeout:?}"),
        };

        let error = SourceError {
            provider_id: id.to_string(),
            provider_name: name,
            message,
        };
        warn!(provider = %error.provider_id, "{error}");
        aggregation.errors.push(error);
    }

    aggregation
}
