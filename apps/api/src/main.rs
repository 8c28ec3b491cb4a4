mod config;
mod enhancement;
mod errors;
mod layout;
mod llm_client;
mod models;
mod persistence;
mod render;
mod routes;
mod state;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::enhancement::LlmEnhancer;
use crate::llm_client::LlmClient;
use crate::persistence::FileStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV wizard API v{}", env!("CARGO_PKG_VERSION"));

    // Document slot
    let store = Arc::new(FileStore::new(&config.storage_dir, &config.storage_key));
    info!("Document store: {}", store.path().display());

    // Text enhancement
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    if llm.has_api_key() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        info!("ANTHROPIC_API_KEY not set; text improvement will be unavailable");
    }
    let enhancer = Arc::new(LlmEnhancer::new(llm));

    let state = AppState::new(config.clone(), store, enhancer);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
