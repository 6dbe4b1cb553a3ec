//! Media ingestion service
//!
//! Attaches an uploaded asset to a video record: resolve → authorize → read → validate →
//! locate → store → point → persist. The record's URL field is only touched after the
//! storage backend has accepted the bytes.

use std::sync::Arc;
use std::time::Instant;

use clipvault_core::{AppError, AssetSlot, CallerIdentity, UploadValidator, Video};
use clipvault_db::VideoRepository;
use clipvault_storage::Locator;
use uuid::Uuid;

use super::source::UploadSource;
use crate::error::storage_error_to_app;
use crate::state::SlotState;

pub struct MediaIngestService {
    videos: Arc<dyn VideoRepository>,
}

impl MediaIngestService {
    pub fn new(videos: Arc<dyn VideoRepository>) -> Self {
        Self { videos }
    }

    async fn load(&self, record_id: Uuid) -> Result<Video, AppError> {
        self.videos
            .get(record_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }

    #[tracing::instrument(
        skip(self, slot, source),
        fields(
            video_id = %record_id,
            user_id = %caller.user_id,
            slot = %slot.config.slot,
            backend = %slot.config.backend,
        )
    )]
    pub async fn ingest<S: UploadSource>(
        &self,
        record_id: Uuid,
        caller: CallerIdentity,
        slot: &SlotState,
        source: S,
    ) -> Result<Video, AppError> {
        let start = Instant::now();
        let kind = slot.config.slot;

        let mut video = self.load(record_id).await?;
        if !video.is_owned_by(caller.user_id) {
            return Err(AppError::Forbidden("Not authorized to update this video".to_string()));
        }

        let validator = UploadValidator::for_slot(&slot.config);
        let raw = source
            .read_file(kind.field_name(), validator.max_size_bytes())
            .await?;
        let upload = validator.validate(raw)?;

        let locator = Locator::derive(slot.config.locator, record_id, &upload.media_type);
        let size = upload.size();

        let url = slot
            .storage
            .store(record_id, &locator, &upload.media_type, upload.data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, locator = %locator, "Failed to store asset");
                storage_error_to_app(e)
            })?;

        video.set_asset_url(kind, url);

        let updated = match self.videos.update_asset_url(&video, kind).await {
            Ok(updated) => updated,
            Err(e @ AppError::NotFound(_)) => return Err(e),
            Err(e) => {
                // No compensating delete: the stored asset is orphaned.
                tracing::error!(
                    error = %e,
                    locator = %locator,
                    "Asset stored but video record update failed"
                );
                return Err(AppError::PersistenceFailed(e.to_string()));
            }
        };

        // Thumbnail uploads answer with a fresh read of the record.
        let video = match kind {
            AssetSlot::Thumbnail => self.load(record_id).await?,
            AssetSlot::Video => updated,
        };

        tracing::info!(
            size_bytes = size,
            locator = %locator,
            duration_ms = start.elapsed().as_millis() as u64,
            "Asset ingested"
        );

        Ok(video)
    }
}
