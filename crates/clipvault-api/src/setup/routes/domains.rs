//! Domain route groups: asset uploads and in-memory retrieval.

use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use clipvault_core::AssetSlot;
use std::sync::Arc;

/// Room for multipart boundaries and part headers on top of the payload ceiling.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

fn body_limit(state: &AppState, slot: AssetSlot) -> DefaultBodyLimit {
    let limit = state
        .slot(slot)
        .config
        .max_size_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

pub fn upload_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/thumbnail_upload/{videoId}",
            post(handlers::asset_upload::upload_thumbnail)
                .layer(body_limit(&state, AssetSlot::Thumbnail)),
        )
        .route(
            "/api/video_upload/{videoId}",
            post(handlers::asset_upload::upload_video).layer(body_limit(&state, AssetSlot::Video)),
        )
        .with_state(state)
}

pub fn retrieval_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/thumbnails/{videoId}",
            get(handlers::asset_get::get_thumbnail),
        )
        .route(
            "/api/assets/video/{videoId}",
            get(handlers::asset_get::get_video_asset),
        )
        .with_state(state)
}
