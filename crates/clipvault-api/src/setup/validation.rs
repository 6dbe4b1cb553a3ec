//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use clipvault_core::{AssetSlot, Config, StorageBackend};

/// Validate critical configuration values
///
/// Runs the config's own checks, then the ones that only matter for a running server.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.database_url().is_some() && config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    for slot in [AssetSlot::Thumbnail, AssetSlot::Video] {
        let slot_config = config.slot(slot);
        if slot_config.backend == StorageBackend::Memory {
            tracing::warn!(
                slot = %slot,
                max_size_bytes = slot_config.max_size_bytes,
                "In-memory assets are never evicted and are lost on restart"
            );
        }
    }

    if config.database_url().is_none() && config.is_production() {
        tracing::warn!("Running in production without DATABASE_URL; records will not persist");
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
