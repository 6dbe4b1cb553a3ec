use crate::keys::Locator;
use crate::traits::{AssetStorage, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use uuid::Uuid;

/// Stores nothing: the payload is embedded in the descriptor itself as
/// `data:{media_type};base64,{payload}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataUrlStorage;

impl DataUrlStorage {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(media_type: &str, data: &[u8]) -> String {
        format!(
            "data:{};base64,{}",
            media_type,
            general_purpose::STANDARD.encode(data)
        )
    }
}

#[async_trait]
impl AssetStorage for DataUrlStorage {
    async fn store(
        &self,
        record_id: Uuid,
        _locator: &Locator,
        media_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let url = Self::encode(media_type, &data);

        tracing::debug!(
            record_id = %record_id,
            media_type = %media_type,
            size_bytes = data.len(),
            encoded_len = url.len(),
            "Asset encoded as data URL"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::DataUrl
    }
}
