//! Sweep command - evicts expired keys once and exits

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Run a single eviction pass against the configured store
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging);
    config.validate()?;

    let service = crate::create_access_key_service(&config)?;
    let removed = service
        .evict_expired()
        .await
        .context("Eviction sweep failed")?;

    info!(removed, "Sweep complete");

    Ok(())
}
