//! State assembly

use crate::auth::JwtService;
use crate::state::{AppState, SlotState};
use clipvault_core::Config;
use clipvault_db::VideoRepository;
use std::sync::Arc;

/// Wire the record store, slot backends and token service into shared state.
pub fn initialize_services(
    config: &Config,
    videos: Arc<dyn VideoRepository>,
    thumbnail: SlotState,
    video: SlotState,
) -> Arc<AppState> {
    let jwt = Arc::new(JwtService::new(
        config.jwt_secret(),
        config.jwt_expiry_hours(),
    ));

    Arc::new(AppState {
        config: config.clone(),
        videos,
        jwt,
        thumbnail,
        video,
    })
}
