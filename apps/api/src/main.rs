mod config;
mod db;
mod errors;
mod generation;
mod humanize;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::humanize::{HumanizerClient, HumanizerCredentials};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Humanizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (run history)
    let db = create_pool(&config.database_url).await?;

    // Initialize rewriter client
    let rewriter = HumanizerClient::new(
        config.humanizer_api_url.clone(),
        HumanizerCredentials {
            email: config.humanizer_email.clone(),
            password: config.humanizer_password.clone(),
        },
        Duration::from_secs(config.humanizer_timeout_secs),
    )?;
    info!(
        "Rewriter client initialized ({}, timeout {}s)",
        config.humanizer_api_url, config.humanizer_timeout_secs
    );

    // Initialize LLM client
    let llm = LlmClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    info!("Humanize settings: {:?}", config.humanize);

    let state = AppState {
        db,
        rewriter: Arc::new(rewriter),
        generator: Arc::new(llm),
        humanize: config.humanize.clone(),
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
