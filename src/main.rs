//! # TuneMate Social
//!
//! Friend and chat service entry point. Initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Storage and presence backends
//! - HTTP server

use anyhow::Result;
use tracing::info;

use tunemate_social::config::Settings;
use tunemate_social::presentation::http::handlers::health;
use tunemate_social::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for structured logging
    tunemate_social::telemetry::init_tracing();
    health::init_server_start();

    info!("Starting TuneMate social service...");

    // Load configuration from environment and config files
    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        storage = ?settings.storage.backend,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
