use crate::auth::AuthenticatedUser;
use crate::error::HttpAppError;
use crate::services::MediaIngestService;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Multipart, Path, State},
    Json,
};
use clipvault_core::{AssetSlot, Video};
use std::sync::Arc;
use uuid::Uuid;

async fn ingest_into(
    state: &AppState,
    slot: AssetSlot,
    video_id: Uuid,
    caller: AuthenticatedUser,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let service = MediaIngestService::new(state.videos.clone());
    let video = service
        .ingest(video_id, caller.0, state.slot(slot), multipart)
        .await?;
    Ok(Json(video))
}

/// `POST /api/thumbnail_upload/{videoId}`, file in the `thumbnail` field.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_thumbnail"))]
pub async fn upload_thumbnail(
    path: Result<Path<Uuid>, PathRejection>,
    State(state): State<Arc<AppState>>,
    caller: AuthenticatedUser,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let Path(video_id) = path?;
    ingest_into(&state, AssetSlot::Thumbnail, video_id, caller, multipart).await
}

/// `POST /api/video_upload/{videoId}`, file in the `video` field.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_video"))]
pub async fn upload_video(
    path: Result<Path<Uuid>, PathRejection>,
    State(state): State<Arc<AppState>>,
    caller: AuthenticatedUser,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let Path(video_id) = path?;
    ingest_into(&state, AssetSlot::Video, video_id, caller, multipart).await
}
