//! HTTP and WebSocket gateway for the translating messenger.
//!
//! Wires the database, the translation pipeline, the presence registry, and
//! the dispatcher together and serves the client-facing API.

mod config;
mod error;
mod identity;
mod routes;
mod state;
mod ws;

use std::sync::Arc;

use database::Database;
use dispatcher::Dispatcher;
use presence::PresenceRegistry;
use tracing::info;
use translator::{HttpEngine, Translator, TranslatorConfig};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let translator_config = TranslatorConfig::from_env()?;
    info!(addr = %config.addr, "Starting gateway");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build the pipeline
    let engine = Arc::new(HttpEngine::new(&translator_config)?);
    let translator = Arc::new(Translator::new(db.clone(), engine, translator_config));
    let presence = Arc::new(PresenceRegistry::new());
    let dispatcher = Arc::new(Dispatcher::new(db, translator, presence));

    // Build application state
    let state = AppState::new(dispatcher);

    // Build router
    let app = routes::router().with_state(state);

    // Start server
    info!(addr = %config.addr, "Gateway listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
