mod config;
mod errors;
mod llm_client;
mod routes;
mod screening;
mod state;
mod upload;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::pdf_text::PdfTextExtractor;
use crate::screening::store::ResumeStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails without any LLM key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("screener_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PDF worker pool
    let text_extractor = PdfTextExtractor::new();
    text_extractor.initialize(config.pdf_workers)?;

    // Initialize LLM client
    let llm = LlmClient::from_config(&config)?;
    let providers = llm.available_providers();
    info!(
        "LLM client initialized (providers: {:?}, default: {})",
        providers, config.default_provider
    );
    if !llm.is_available(config.default_provider) {
        warn!(
            "Default provider {} has no API key; requests must name another provider",
            config.default_provider
        );
    }

    // Build app state
    let state = AppState {
        llm,
        text_extractor: Arc::new(text_extractor),
        store: ResumeStore::new(),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
