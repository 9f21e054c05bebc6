mod annotation;
mod catalog;
mod chat;
mod config;
mod errors;
mod export;
mod markup;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::repository::ODataPromptCatalog;
use crate::chat::orchestrator::CHAT_TIMEOUT;
use crate::chat::transport::HttpTransport;
use crate::config::Config;
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
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting NLQ API v{}", env!("CARGO_PKG_VERSION"));

    // Prompt service client
    let catalog = ODataPromptCatalog::new(reqwest::Client::new(), &config.prompt_service_url)?;
    info!("Prompt catalog: {}", config.prompt_service_url);

    // Chat backend transport
    let chat_transport = HttpTransport::new()?;
    info!(
        "Chat backend: {} (timeout {}s)",
        config.backend_base_url,
        CHAT_TIMEOUT.as_secs()
    );

    let state = AppState {
        config: config.clone(),
        catalog: Arc::new(catalog),
        chat_transport: Arc::new(chat_transport),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the UI host once it is fixed per environment

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
