//! Storage setup and initialization

use anyhow::{Context, Result};
use clipvault_core::{AssetSlot, Config};
use clipvault_storage::create_storage;

use crate::state::SlotState;

async fn setup_slot(config: &Config, slot: AssetSlot) -> Result<SlotState> {
    let slot_config = config.slot(slot).clone();
    let storage = create_storage(config, &slot_config)
        .await
        .with_context(|| format!("Failed to initialize storage for the {} slot", slot))?;
    Ok(SlotState::new(slot_config, storage))
}

/// Build the backend for each slot; returns `(thumbnail, video)`.
pub async fn setup_storage(config: &Config) -> Result<(SlotState, SlotState)> {
    tracing::info!("Initializing storage backends...");
    let thumbnail = setup_slot(config, AssetSlot::Thumbnail).await?;
    let video = setup_slot(config, AssetSlot::Video).await?;
    Ok((thumbnail, video))
}
