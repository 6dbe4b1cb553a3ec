//! Storage abstraction trait
//!
//! This module defines the AssetStorage trait that all storage backends must implement.

use crate::keys::Locator;
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Staging failed: {0}")]
    StagingFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Bytes held by a backend together with the media type they were stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub data: Bytes,
    pub media_type: String,
}

/// Storage abstraction trait
///
/// Every backend turns a validated payload into a retrieval descriptor: a URL string a
/// client can later use to fetch the bytes. Callers never need to know which backend
/// they are talking to.
#[async_trait]
pub trait AssetStorage: Send + Sync {
    /// Persist `data` for `record_id` under `locator` and return the retrieval descriptor.
    ///
    /// Backends that do not address by key (in-memory, data URL) ignore the locator.
    async fn store(
        &self,
        record_id: Uuid,
        locator: &Locator,
        media_type: &str,
        data: Bytes,
    ) -> StorageResult<String>;

    /// Bytes this backend keeps in-process for `record_id`, if any.
    ///
    /// Only the in-memory backend serves bytes back; everything else answers `None`.
    async fn retrieve(&self, _record_id: Uuid) -> StorageResult<Option<StoredAsset>> {
        Ok(None)
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
