//! ClipVault Storage Library
//!
//! This crate provides the asset storage abstraction and its four backends:
//! an in-memory cache, permanent local files, local staging handed to an
//! S3-compatible object store, and inline data URLs.
//!
//! # Locators
//!
//! Keyed backends store an asset under a [`Locator`], `{stem}.{ext}`, where the stem is
//! either random hex or the owning record id. Locators never contain `/` or `..`.

pub mod data_url;
pub mod factory;
pub mod keys;
pub mod local;
pub mod memory;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use clipvault_core::StorageBackend;
pub use data_url::DataUrlStorage;
pub use factory::{create_storage, LOCAL_ASSETS_PATH, STAGING_DIR};
pub use keys::{extension_for, Locator};
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use s3::S3Storage;
pub use traits::{AssetStorage, StorageError, StorageResult, StoredAsset};
