//! Repository trait abstractions
//!
//! The ingestion flow only needs point reads and writes of a video record, so it depends
//! on this trait rather than on a concrete database.

use async_trait::async_trait;
use clipvault_core::models::Video;
use clipvault_core::{AppError, AssetSlot};
use uuid::Uuid;

/// Record store for videos
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Get a video by ID
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Overwrite a stored video with `video`. `NotFound` if it does not exist.
    async fn update(&self, video: &Video) -> Result<Video, AppError>;

    /// Write only `slot`'s URL and `updated_at` from `video`, leaving the other slot as
    /// currently stored. `NotFound` if it does not exist.
    async fn update_asset_url(&self, video: &Video, slot: AssetSlot) -> Result<Video, AppError>;

    /// Insert a new video
    async fn create(&self, video: &Video) -> Result<Video, AppError>;
}
