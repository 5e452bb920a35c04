//! Bearing RUL Prediction Service - Main Entry Point
//!
//! Usage: `rul-service [SETTINGS_FILE]`. Settings default to
//! `rul-service.toml` (optional) overridden by `RUL__*` environment variables.

use api::{init_logging, run_server, ServiceSettings};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings_path = std::env::args().nth(1);
    let settings = ServiceSettings::load(settings_path.as_deref())?;
    init_logging(&settings.logging)?;

    info!("=== Bearing RUL Service v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Model: {}, config: {}",
        settings.model.model_path.display(),
        settings.model.config_path.display()
    );

    // Missing or malformed artifacts are fatal: refuse to serve
    if let Err(e) = run_server(settings).await {
        error!("FATAL: {}", e);
        return Err(e.into());
    }

    Ok(())
}
