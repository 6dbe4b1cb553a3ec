use crate::{
    AssetStorage, DataUrlStorage, LocalStorage, MemoryStorage, S3Storage, StorageBackend,
    StorageError, StorageResult,
};
use clipvault_core::{Config, SlotConfig};
use std::sync::Arc;

/// Directory under the asset root that holds files awaiting remote transfer.
pub const STAGING_DIR: &str = ".staging";

/// Path under the public base URL where the local asset root is served.
pub const LOCAL_ASSETS_PATH: &str = "/assets";

/// Create the storage backend for one slot based on configuration
pub async fn create_storage(
    config: &Config,
    slot: &SlotConfig,
) -> StorageResult<Arc<dyn AssetStorage>> {
    let public_base_url = config.public_base_url().trim_end_matches('/');

    let storage: Arc<dyn AssetStorage> = match slot.backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new(format!(
            "{}{}",
            public_base_url,
            slot.slot.retrieval_path()
        ))),

        StorageBackend::Local => Arc::new(
            LocalStorage::new(
                config.asset_root(),
                format!("{}{}", public_base_url, LOCAL_ASSETS_PATH),
            )
            .await?,
        ),

        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);

            Arc::new(
                S3Storage::new(
                    bucket,
                    region,
                    endpoint,
                    config.asset_root().join(STAGING_DIR),
                )
                .await?,
            )
        }

        StorageBackend::DataUrl => Arc::new(DataUrlStorage::new()),
    };

    tracing::info!(
        slot = %slot.slot,
        backend = %slot.backend,
        locator = %slot.locator,
        max_size_bytes = slot.max_size_bytes,
        "Storage backend initialized"
    );

    Ok(storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipvault_core::AssetSlot;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let mut vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vars.insert(
            "JWT_SECRET".to_string(),
            "0123456789abcdef0123456789abcdef".to_string(),
        );
        Config::from_lookup(move |key| vars.get(key).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_default_thumbnail_backend_is_memory() {
        let config = config(&[]);
        let storage = create_storage(&config, config.slot(AssetSlot::Thumbnail))
            .await
            .unwrap();
        assert_eq!(storage.backend_type(), StorageBackend::Memory);
    }

    #[tokio::test]
    async fn test_local_backend_creates_asset_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("assets");
        let config = config(&[
            ("ASSET_ROOT", root.to_str().unwrap()),
            ("VIDEO_STORAGE_BACKEND", "local"),
        ]);

        let storage = create_storage(&config, config.slot(AssetSlot::Video))
            .await
            .unwrap();

        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_s3_without_bucket_is_a_config_error() {
        let config = config(&[]);
        let result = create_storage(&config, config.slot(AssetSlot::Video)).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
