mod config;
mod errors;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod providers;
mod resume;
mod routes;
mod search;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::matching::LlmResumeMatcher;
use crate::providers::{
    build_http_client, linkedin::LinkedInProvider, workday::WorkdayProvider, ProviderRegistry,
};
use crate::resume::PdfExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentFlow API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = Arc::new(LlmClient::new(config.anthropic_api_key.clone())?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize job providers (one shared scraping client)
    let http = build_http_client()?;
    let providers = ProviderRegistry::new()
        .with(Arc::new(LinkedInProvider::new(http.clone(), config.demo_fallback)))
        .with(Arc::new(WorkdayProvider::new(http, config.demo_fallback)));
    info!(
        "Job providers registered: {:?} (demo fallback: {})",
        providers.ids(),
        config.demo_fallback
    );

    let state = AppState {
        config: config.clone(),
        providers,
        llm: llm.clone(),
        matcher: Arc::new(LlmResumeMatcher(llm)),
        extractor: Arc::new(PdfExtractor),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
