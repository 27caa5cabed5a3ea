//! # Job Tracker Main Entry Point
//!
//! This is the main entry point for the job tracker API service.

use job_tracker::{config::ConfigLoader, db, server::run_server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config = ConfigLoader::new().load()?;
    init_tracing(&config)?;

    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "Effective configuration");
    }

    let connection = db::init_pool(&config).await?;
    if config.run_migrations {
        db::run_migrations(&connection).await?;
    }

    run_server(config, connection).await
}
