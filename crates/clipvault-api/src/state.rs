//! Application state.
//!
//! Storage backends are chosen once per slot at startup and live here as trait objects,
//! next to the record store and token service.

use crate::auth::JwtService;
use clipvault_core::{AssetSlot, Config, SlotConfig};
use clipvault_db::VideoRepository;
use clipvault_storage::AssetStorage;
use std::sync::Arc;

/// Limits and backend for one asset slot.
#[derive(Clone)]
pub struct SlotState {
    pub config: SlotConfig,
    pub storage: Arc<dyn AssetStorage>,
}

impl SlotState {
    pub fn new(config: SlotConfig, storage: Arc<dyn AssetStorage>) -> Self {
        Self { config, storage }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    pub jwt: Arc<JwtService>,
    pub thumbnail: SlotState,
    pub video: SlotState,
}

impl AppState {
    pub fn slot(&self, slot: AssetSlot) -> &SlotState {
        match slot {
            AssetSlot::Thumbnail => &self.thumbnail,
            AssetSlot::Video => &self.video,
        }
    }
}
