//! Process-local video repository.

use async_trait::async_trait;
use clipvault_core::models::Video;
use clipvault_core::{AppError, AssetSlot};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repository_traits::VideoRepository;

/// Video records held in a shared map; clones see the same records.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a record, as if it were deleted by another service.
    pub async fn remove(&self, id: Uuid) -> Option<Video> {
        self.videos.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.videos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.videos.read().await.is_empty()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(video.clone())
            }
            None => Err(AppError::NotFound(format!("Video {} not found", video.id))),
        }
    }

    async fn update_asset_url(&self, video: &Video, slot: AssetSlot) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        let existing = videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video.id)))?;
        match slot {
            AssetSlot::Thumbnail => existing.thumbnail_url = video.thumbnail_url.clone(),
            AssetSlot::Video => existing.video_url = video.video_url.clone(),
        }
        existing.updated_at = video.updated_at;
        Ok(existing.clone())
    }

    async fn create(&self, video: &Video) -> Result<Video, AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::InvalidInput(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(video.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_update() {
        let repo = InMemoryVideoRepository::new();
        let mut video = Video::new(Uuid::new_v4(), "intro", None);

        repo.create(&video).await.unwrap();
        assert_eq!(repo.get(video.id).await.unwrap(), Some(video.clone()));

        video.set_asset_url(AssetSlot::Video, "https://example.com/v.mp4".to_string());
        let updated = repo.update(&video).await.unwrap();
        assert_eq!(updated.video_url.as_deref(), Some("https://example.com/v.mp4"));
        assert_eq!(repo.get(video.id).await.unwrap(), Some(video));
    }

    #[tokio::test]
    async fn test_asset_url_update_keeps_the_other_slot() {
        let repo = InMemoryVideoRepository::new();
        let video = repo
            .create(&Video::new(Uuid::new_v4(), "intro", None))
            .await
            .unwrap();

        // Two writers start from the same snapshot and each fill a different slot.
        let mut thumb = video.clone();
        thumb.set_asset_url(AssetSlot::Thumbnail, "https://example.com/t.png".to_string());
        let mut clip = video.clone();
        clip.set_asset_url(AssetSlot::Video, "https://example.com/v.mp4".to_string());

        repo.update_asset_url(&thumb, AssetSlot::Thumbnail)
            .await
            .unwrap();
        let stored = repo.update_asset_url(&clip, AssetSlot::Video).await.unwrap();

        assert_eq!(stored.thumbnail_url.as_deref(), Some("https://example.com/t.png"));
        assert_eq!(stored.video_url.as_deref(), Some("https://example.com/v.mp4"));
        assert_eq!(repo.get(video.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn test_asset_url_update_missing_record() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "ghost", None);
        assert!(matches!(
            repo.update_asset_url(&video, AssetSlot::Video).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "ghost", None);
        assert!(matches!(
            repo.update(&video).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "intro", None);
        repo.create(&video).await.unwrap();
        assert!(repo.create(&video).await.is_err());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let repo = InMemoryVideoRepository::new();
        let video = Video::new(Uuid::new_v4(), "intro", None);
        repo.create(&video).await.unwrap();
        assert!(repo.remove(video.id).await.is_some());
        assert!(repo.is_empty().await);
        assert_eq!(repo.get(video.id).await.unwrap(), None);
    }
}
