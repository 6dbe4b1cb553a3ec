use crate::keys::Locator;
use crate::local::write_file;
use crate::traits::{AssetStorage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// S3 storage implementation
///
/// Every upload is first written to a staging file under `staging_dir`, then streamed
/// from that file to the object store. The staging file is removed on every exit path.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    staging_dir: PathBuf,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `staging_dir` - Local scratch directory for files awaiting transfer
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        staging_dir: impl Into<PathBuf>,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Self::with_store(Arc::new(store), bucket, region, endpoint_url, staging_dir).await
    }

    /// Build on top of an existing object store (any `ObjectStore`, e.g. an in-memory one).
    pub async fn with_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        staging_dir: impl Into<PathBuf>,
    ) -> StorageResult<Self> {
        let staging_dir = staging_dir.into();
        tokio::fs::create_dir_all(&staging_dir).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create staging directory {}: {}",
                staging_dir.display(),
                e
            ))
        })?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
            staging_dir,
        })
    }

    /// Generate public URL for S3 object
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style on the endpoint: {endpoint}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    /// Stream the staged file to `key`, tagging the object with its content type.
    async fn transfer(
        &self,
        staged: &std::path::Path,
        key: &str,
        media_type: &str,
    ) -> StorageResult<()> {
        let mut file = tokio::fs::File::open(staged).await.map_err(|e| {
            StorageError::StagingFailed(format!(
                "Failed to reopen staged file {}: {}",
                staged.display(),
                e
            ))
        })?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, media_type.to_string().into());

        let mut writer = BufWriter::new(Arc::clone(&self.store), Path::from(key))
            .with_attributes(attributes);

        let copied = tokio::io::copy(&mut file, &mut writer).await;
        let finished = match copied {
            Ok(_) => writer.shutdown().await,
            Err(e) => Err(e),
        };

        if let Err(e) = finished {
            if let Err(abort_err) = writer.abort().await {
                tracing::warn!(
                    error = %abort_err,
                    key = %key,
                    "Failed to abort partial S3 upload"
                );
            }
            return Err(StorageError::UploadFailed(e.to_string()));
        }

        Ok(())
    }
}

/// Removes the staged file, asynchronously via [`StagingGuard::remove`] or on drop
/// if the upload future is cancelled first.
struct StagingGuard {
    path: PathBuf,
    armed: bool,
}

impl StagingGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    async fn remove(mut self) {
        let result = tokio::fs::remove_file(&self.path).await;
        self.armed = false;
        log_removal(&self.path, result);
    }
}

impl Drop for StagingGuard {
    fn drop(&mut self) {
        if self.armed {
            log_removal(&self.path, std::fs::remove_file(&self.path));
        }
    }
}

fn log_removal(path: &std::path::Path, result: std::io::Result<()>) {
    match result {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            error = %e,
            path = %path.display(),
            "Failed to remove staged file"
        ),
    }
}

#[async_trait]
impl AssetStorage for S3Storage {
    async fn store(
        &self,
        record_id: Uuid,
        locator: &Locator,
        media_type: &str,
        data: Bytes,
    ) -> StorageResult<String> {
        let key = locator.as_str();
        let size = data.len();
        let start = std::time::Instant::now();

        // Staging names are always random so concurrent uploads for one record never collide.
        let staging =
            StagingGuard::new(self.staging_dir.join(Locator::randomized(media_type).as_str()));

        let result = match write_file(&staging.path, &data).await {
            Ok(()) => self.transfer(&staging.path, key, media_type).await,
            Err(e) => Err(StorageError::StagingFailed(e.to_string())),
        };
        staging.remove().await;

        if let Err(e) = result {
            tracing::error!(
                error = %e,
                record_id = %record_id,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            return Err(e);
        }

        let url = self.generate_url(key);

        tracing::info!(
            record_id = %record_id,
            bucket = %self.bucket,
            key = %key,
            media_type = %media_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use object_store::memory::InMemory;
    use object_store::ObjectStoreExt;

    async fn storage_with(
        store: Arc<dyn ObjectStore>,
        staging: &std::path::Path,
        endpoint: Option<&str>,
    ) -> S3Storage {
        S3Storage::with_store(
            store,
            "clips".to_string(),
            "us-east-1".to_string(),
            endpoint.map(String::from),
            staging,
        )
        .await
        .unwrap()
    }

    fn staged_files(dir: &std::path::Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_staging_guard_removes_file_on_both_paths() {
        let dir = tempfile::tempdir().unwrap();

        let removed = dir.path().join("removed.bin");
        std::fs::write(&removed, b"staged").unwrap();
        StagingGuard::new(removed.clone()).remove().await;
        assert!(!removed.exists());

        let dropped = dir.path().join("dropped.bin");
        std::fs::write(&dropped, b"staged").unwrap();
        drop(StagingGuard::new(dropped.clone()));
        assert!(!dropped.exists());

        // Already gone: nothing to do, nothing to report.
        StagingGuard::new(removed).remove().await;
        assert_eq!(staged_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_upload_returns_virtual_hosted_url_and_cleans_staging() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(InMemory::new());
        let storage = storage_with(remote.clone(), dir.path(), None).await;
        let id = Uuid::new_v4();
        let locator = Locator::record_keyed(id, "video/mp4");

        let url = storage
            .store(id, &locator, "video/mp4", Bytes::from_static(b"ftypmp42"))
            .await
            .unwrap();

        assert_eq!(
            url,
            format!("https://clips.s3.us-east-1.amazonaws.com/{}.mp4", id)
        );
        let stored = remote
            .get(&Path::from(locator.as_str()))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(stored, Bytes::from_static(b"ftypmp42"));
        assert_eq!(staged_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_endpoint_uses_path_style_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_with(
            Arc::new(InMemory::new()),
            dir.path(),
            Some("http://localhost:9000/"),
        )
        .await;

        assert_eq!(
            storage.generate_url("abc.mp4"),
            "http://localhost:9000/clips/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_record_keyed_reupload_leaves_one_object() {
        let dir = tempfile::tempdir().unwrap();
        let remote = Arc::new(InMemory::new());
        let storage = storage_with(remote.clone(), dir.path(), None).await;
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

        let objects: Vec<_> = remote.list(None).try_collect().await.unwrap();
        assert_eq!(objects.len(), 1);
        let stored = remote
            .get(&Path::from(locator.as_str()))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(stored, Bytes::from_static(b"second"));
        assert_eq!(staged_files(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_failed_transfer_still_cleans_staging() {
        let dir = tempfile::tempdir().unwrap();
        let staging = dir.path().join("staging");
        let remote_root = dir.path().join("remote");
        std::fs::create_dir_all(&remote_root).unwrap();
        let remote = Arc::new(
            object_store::local::LocalFileSystem::new_with_prefix(&remote_root).unwrap(),
        );
        let storage = storage_with(remote, &staging, None).await;
        // With the remote root replaced by a plain file, no object can be written.
        std::fs::remove_dir(&remote_root).unwrap();
        std::fs::write(&remote_root, b"not a directory").unwrap();

        let result = storage
            .store(
                Uuid::new_v4(),
                &Locator::randomized("video/mp4"),
                "video/mp4",
                Bytes::from_static(b"payload"),
            )
            .await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert_eq!(staged_files(&staging), 0);
    }

    #[test]
    fn test_guard_ignores_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let guard = StagingGuard::new(dir.path().join("never-written.mp4"));
        drop(guard);
    }
}
