use crate::keys::Locator;
use crate::traits::{AssetStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem storage implementation
///
/// Files are written to `{base_path}/{locator}` and kept indefinitely; the descriptor is
/// `{base_url}/{locator}`, which the API serves statically.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "./assets")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert a locator to a filesystem path under the base directory.
    ///
    /// Locators are generated, never client-supplied, but a key that would escape the
    /// base directory is still refused.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.starts_with('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid characters: {}",
                storage_key
            )));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

/// Create (or truncate) `path` and write `data` to it, flushing to disk before returning.
pub(crate) async fn write_file(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(path).await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
    })?;

    file.write_all(data).await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[async_trait]
impl AssetStorage for LocalStorage {
    async fn store(
        &self,
        record_id: Uuid,
        locator: &Locator,
        media_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let key = locator.as_str();
        let path = self.key_to_path(key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        if let Err(e) = write_file(&path, &data).await {
            tracing::error!(
                error = %e,
                record_id = %record_id,
                path = %path.display(),
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Local write failed"
            );
            return Err(e);
        }

        tracing::info!(
            record_id = %record_id,
            path = %path.display(),
            key = %key,
            media_type = %media_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local write successful"
        );

        Ok(self.generate_url(key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8091/assets/".to_string())
            .await
            .unwrap();
        let locator = Locator::randomized("image/png");

        let url = storage
            .store(Uuid::new_v4(), &locator, "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();

        assert_eq!(url, format!("http://localhost:8091/assets/{}", locator));
        let written = std::fs::read(dir.path().join(locator.as_str())).unwrap();
        assert_eq!(written, b"png");
    }

    #[tokio::test]
    async fn test_record_keyed_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost/assets".to_string())
            .await
            .unwrap();
        let id = Uuid::new_v4();
        let locator = Locator::record_keyed(id, "video/mp4");

        storage
            .store(id, &locator, "video/mp4", Bytes::from_static(b"first"))
            .await
            .unwrap();
        storage
            .store(id, &locator, "video/mp4", Bytes::from_static(b"second"))
            .await
            .unwrap();

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
        let written = std::fs::read(dir.path().join(format!("{}.mp4", id))).unwrap();
        assert_eq!(written, b"second");
    }

    #[tokio::test]
    async fn test_key_to_path_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost/assets".to_string())
            .await
            .unwrap();

        assert!(matches!(
            storage.key_to_path("../escape.png"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(
            storage.key_to_path("/etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(storage.key_to_path("abc.png").is_ok());
    }

    #[tokio::test]
    async fn test_store_fails_when_base_path_is_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("assets");
        let storage = LocalStorage::new(&base, "http://localhost/assets".to_string())
            .await
            .unwrap();
        // Replace the directory with a plain file so every write underneath fails.
        std::fs::remove_dir(&base).unwrap();
        std::fs::write(&base, b"not a directory").unwrap();

        let result = storage
            .store(
                Uuid::new_v4(),
                &Locator::randomized("image/png"),
                "image/png",
                Bytes::from_static(b"png"),
            )
            .await;

        assert!(result.is_err());
    }
}
