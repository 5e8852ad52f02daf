use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextCompleter;
use crate::matching::ResumeMatcher;
use crate::providers::ProviderRegistry;
use crate::resume::ResumeExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup; nothing in it is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Job sources, in default query order.
    pub providers: ProviderRegistry,
    /// Used for résumé summaries.
    pub llm: Arc<dyn TextCompleter>,
    /// Pluggable résumé matcher. Default: LlmResumeMatcher over `llm`.
    pub matcher: Arc<dyn ResumeMatcher>,
    pub extractor: Arc<dyn ResumeExtractor>,
}
