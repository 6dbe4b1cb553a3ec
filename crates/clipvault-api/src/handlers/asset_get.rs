use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use clipvault_core::{AppError, AssetSlot};
use std::sync::Arc;
use uuid::Uuid;

/// Serve bytes the slot's backend keeps in process. Backends that keep nothing answer 404.
async fn serve_slot(
    state: &AppState,
    slot: AssetSlot,
    video_id: Uuid,
) -> Result<Response, HttpAppError> {
    state
        .videos
        .get(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    let asset = state
        .slot(slot)
        .storage
        .retrieve(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", capitalized(slot))))?;

    Ok((
        [
            (CONTENT_TYPE, asset.media_type),
            (CACHE_CONTROL, "no-store".to_string()),
        ],
        asset.data,
    )
        .into_response())
}

fn capitalized(slot: AssetSlot) -> &'static str {
    match slot {
        AssetSlot::Thumbnail => "Thumbnail",
        AssetSlot::Video => "Video",
    }
}

/// `GET /api/thumbnails/{videoId}`
#[tracing::instrument(skip(state), fields(operation = "get_thumbnail"))]
pub async fn get_thumbnail(
    path: Result<Path<Uuid>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let Path(video_id) = path?;
    serve_slot(&state, AssetSlot::Thumbnail, video_id).await
}

/// `GET /api/assets/video/{videoId}`
#[tracing::instrument(skip(state), fields(operation = "get_video_asset"))]
pub async fn get_video_asset(
    path: Result<Path<Uuid>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let Path(video_id) = path?;
    serve_slot(&state, AssetSlot::Video, video_id).await
}
