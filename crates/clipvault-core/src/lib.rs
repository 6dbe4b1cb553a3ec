//! ClipVault Core Library
//!
//! This crate provides the domain models, error types, configuration, and upload
//! validation shared by the storage, database, and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, SlotConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AssetSlot, CallerIdentity, Video};
pub use storage_types::{LocatorStrategy, StorageBackend};
pub use validation::{
    media_type_essence, RawUpload, UploadError, UploadValidator, ValidatedUpload,
};
