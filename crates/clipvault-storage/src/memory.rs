//! In-process asset cache.
//!
//! Entries live in a sharded concurrent map keyed by record id, so writes for different
//! records never contend on a single lock. Nothing is evicted and nothing survives a restart.

use crate::keys::Locator;
use crate::traits::{AssetStorage, StorageResult, StoredAsset};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Memory-backed storage; clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    assets: Arc<DashMap<Uuid, StoredAsset>>,
    base_url: String,
}

impl MemoryStorage {
    /// `base_url` is the route the API serves these bytes from, e.g.
    /// `http://localhost:8091/api/thumbnails`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            assets: Arc::new(DashMap::new()),
            base_url: base_url.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    fn generate_url(&self, record_id: Uuid) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), record_id)
    }
}

#[async_trait]
impl AssetStorage for MemoryStorage {
    async fn store(
        &self,
        record_id: Uuid,
        _locator: &Locator,
        media_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let size = data.len();
        let replaced = self
            .assets
            .insert(
                record_id,
                StoredAsset {
                    data,
                    media_type: media_type.to_string(),
                },
            )
            .is_some();

        tracing::debug!(
            record_id = %record_id,
            media_type = %media_type,
            size_bytes = size,
            replaced,
            cached_entries = self.assets.len(),
            "Asset cached in memory"
        );

        Ok(self.generate_url(record_id))
    }

    async fn retrieve(&self, record_id: Uuid) -> StorageResult<Option<StoredAsset>> {
        Ok(self.assets.get(&record_id).map(|entry| entry.value().clone()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_then_retrieve() {
        let storage = MemoryStorage::new("http://localhost:8091/api/thumbnails/");
        let id = Uuid::new_v4();

        let url = storage
            .store(
                id,
                &Locator::randomized("image/png"),
                "image/png",
                Bytes::from_static(b"\x89PNG"),
            )
            .await
            .unwrap();

        assert_eq!(url, format!("http://localhost:8091/api/thumbnails/{}", id));
        let asset = storage.retrieve(id).await.unwrap().unwrap();
        assert_eq!(asset.data, Bytes::from_static(b"\x89PNG"));
        assert_eq!(asset.media_type, "image/png");
    }

    #[tokio::test]
    async fn test_same_id_is_last_write_wins() {
        let storage = MemoryStorage::new("http://localhost/api/thumbnails");
        let id = Uuid::new_v4();
        let locator = Locator::randomized("image/png");

        storage
            .store(id, &locator, "image/png", Bytes::from_static(b"one"))
            .await
            .unwrap();
        storage
            .store(id, &locator, "image/jpeg", Bytes::from_static(b"two"))
            .await
            .unwrap();

        assert_eq!(storage.len(), 1);
        let asset = storage.retrieve(id).await.unwrap().unwrap();
        assert_eq!(asset.data, Bytes::from_static(b"two"));
        assert_eq!(asset.media_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_unknown_id_returns_none() {
        let storage = MemoryStorage::new("http://localhost/api/thumbnails");
        assert!(storage.retrieve(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_writes_for_different_ids() {
        let storage = MemoryStorage::new("http://localhost/api/thumbnails");
        let ids: Vec<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();

        let handles: Vec<_> = ids
            .iter()
            .map(|id| {
                let storage = storage.clone();
                let id = *id;
                tokio::spawn(async move {
                    storage
                        .store(
                            id,
                            &Locator::randomized("image/png"),
                            "image/png",
                            Bytes::from(id.as_bytes().to_vec()),
                        )
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(storage.len(), ids.len());
        for id in ids {
            let asset = storage.retrieve(id).await.unwrap().unwrap();
            assert_eq!(asset.data.as_ref(), id.as_bytes());
        }
    }
}
