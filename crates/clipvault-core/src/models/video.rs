use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slot::AssetSlot;

/// A video record owned by a single user.
///
/// `thumbnail_url` and `video_url` stay `None` until bytes for that slot have been stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(user_id: Uuid, title: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn asset_url(&self, slot: AssetSlot) -> Option<&str> {
        match slot {
            AssetSlot::Thumbnail => self.thumbnail_url.as_deref(),
            AssetSlot::Video => self.video_url.as_deref(),
        }
    }

    /// Points `slot` at `url` and bumps `updated_at`. Only the given slot is touched.
    pub fn set_asset_url(&mut self, slot: AssetSlot, url: String) {
        match slot {
            AssetSlot::Thumbnail => self.thumbnail_url = Some(url),
            AssetSlot::Video => self.video_url = Some(url),
        }
        self.updated_at = Utc::now();
    }
}
