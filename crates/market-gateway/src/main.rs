//! Gateway server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p market-gateway
//! ```

use market_common::{try_init_tracing_with_config, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let tracing_config = std::env::var("APP_ENV")
        .ok()
        .and_then(|raw| Environment::parse(&raw))
        .map_or_else(TracingConfig::default, TracingConfig::for_environment);
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Marketplace Gateway...");

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(env = ?config.app.env, port = config.gateway.port, "Configuration loaded");

    market_gateway::run(config).await?;

    Ok(())
}
