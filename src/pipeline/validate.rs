// src/pipeline/validate.rs

use crate::error::Result;
use crate::models::Config;

/// Validate configuration and report the effective settings.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    match config.validate() {
        Ok(()) => {
            log::info!("✓ Config OK");
            log::info!("    Feed URL: {}", config.feed.url);
            log::info!("    User-Agent: {}", config.feed.user_agent);
            log::info!("    Timeout: {}s", config.feed.timeout_secs);
            log::info!("    Pretty JSON: {}", config.storage.pretty);
            Ok(())
        }
        Err(e) => {
            log::error!("Config validation failed: {}", e);
            Err(e)
        }
    }
}
