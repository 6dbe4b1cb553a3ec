use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Which URL field on a [`Video`](super::Video) an upload fills.
///
/// The two slots are independent: each has its own size ceiling, storage backend and
/// locator strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSlot {
    Thumbnail,
    Video,
}

impl AssetSlot {
    /// Multipart field that carries the file for this slot.
    pub fn field_name(&self) -> &'static str {
        match self {
            AssetSlot::Thumbnail => "thumbnail",
            AssetSlot::Video => "video",
        }
    }

    /// Route segment under which in-memory bytes for this slot are served.
    pub fn retrieval_path(&self) -> &'static str {
        match self {
            AssetSlot::Thumbnail => "/api/thumbnails",
            AssetSlot::Video => "/api/assets/video",
        }
    }
}

impl Display for AssetSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.field_name())
    }
}

/// Authenticated caller, as established by a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user_id: Uuid,
}

impl CallerIdentity {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
