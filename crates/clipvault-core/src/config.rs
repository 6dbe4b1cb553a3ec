//! Configuration module
//!
//! This module provides configuration structures for the API server, including
//! database, per-slot storage, authentication, and logging settings.

use std::env;
use std::path::{Path, PathBuf};

use crate::models::AssetSlot;
use crate::storage_types::{LocatorStrategy, StorageBackend};

// Common constants
const DEFAULT_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const JWT_EXPIRY_HOURS: i64 = 24;
const MAX_THUMBNAIL_SIZE_MB: u64 = 10;
const MAX_VIDEO_SIZE_MB: u64 = 1024;
const BYTES_PER_MB: u64 = 1024 * 1024;
const VIDEO_MEDIA_TYPE: &str = "video/mp4";

/// Storage and validation settings for one asset slot.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotConfig {
    pub slot: AssetSlot,
    pub backend: StorageBackend,
    pub locator: LocatorStrategy,
    /// Largest accepted payload. A payload of exactly this size passes.
    pub max_size_bytes: u64,
    /// When set, the declared media type must match (parameters and case ignored).
    pub required_media_type: Option<String>,
}

impl SlotConfig {
    pub fn thumbnail(backend: StorageBackend) -> Self {
        Self {
            slot: AssetSlot::Thumbnail,
            backend,
            locator: LocatorStrategy::Randomized,
            max_size_bytes: MAX_THUMBNAIL_SIZE_MB * BYTES_PER_MB,
            required_media_type: None,
        }
    }

    /// Remote-backed videos are keyed by record id so a re-upload replaces the object.
    pub fn video(backend: StorageBackend) -> Self {
        let locator = match backend {
            StorageBackend::S3 => LocatorStrategy::RecordKeyed,
            _ => LocatorStrategy::Randomized,
        };
        Self {
            slot: AssetSlot::Video,
            backend,
            locator,
            max_size_bytes: MAX_VIDEO_SIZE_MB * BYTES_PER_MB,
            required_media_type: Some(VIDEO_MEDIA_TYPE.to_string()),
        }
    }
}

/// Base configuration shared by every component
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,
    pub log_format: String,
}

/// Media ingestion service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    /// Postgres connection string. When unset the record store lives in memory.
    pub database_url: Option<String>,
    // Storage configuration
    pub asset_root: PathBuf,
    pub public_base_url: String,
    pub thumbnail: SlotConfig,
    pub video: SlotConfig,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup instead of the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ServiceConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.inner().base.jwt_expiry_hours
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn asset_root(&self) -> &Path {
        &self.inner().asset_root
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner().public_base_url
    }

    pub fn slot(&self, slot: AssetSlot) -> &SlotConfig {
        match slot {
            AssetSlot::Thumbnail => &self.inner().thumbnail,
            AssetSlot::Video => &self.inner().video,
        }
    }

    /// Whether any slot stores through `backend`.
    pub fn uses_backend(&self, backend: StorageBackend) -> bool {
        self.inner().thumbnail.backend == backend || self.inner().video.backend == backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    /// `S3_REGION`, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.inner()
            .s3_region
            .as_deref()
            .or(self.inner().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Reads a size in MiB and converts it to bytes.
fn parse_ceiling<F>(lookup: &F, key: &str, default_mb: u64) -> Result<u64, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    parse_or(lookup, key, default_mb)
        .checked_mul(BYTES_PER_MB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large", key))
}

impl ServiceConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port: u16 = match lookup("PORT") {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => DEFAULT_PORT,
        };

        let base = BaseConfig {
            server_port,
            cors_origins,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
            db_timeout_seconds: parse_or(&lookup, "DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_expiry_hours: parse_or(&lookup, "JWT_EXPIRY_HOURS", JWT_EXPIRY_HOURS),
            environment,
            log_format: lookup("LOG_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| "compact".to_string()),
        };

        let thumbnail_backend = parse_backend(&lookup, "THUMBNAIL_STORAGE_BACKEND")?
            .unwrap_or(StorageBackend::Memory);
        let mut thumbnail = SlotConfig::thumbnail(thumbnail_backend);
        if let Some(locator) = parse_locator(&lookup, "THUMBNAIL_LOCATOR")? {
            thumbnail.locator = locator;
        }
        thumbnail.max_size_bytes =
            parse_ceiling(&lookup, "MAX_THUMBNAIL_SIZE_MB", MAX_THUMBNAIL_SIZE_MB)?;

        let video_backend =
            parse_backend(&lookup, "VIDEO_STORAGE_BACKEND")?.unwrap_or(StorageBackend::S3);
        let mut video = SlotConfig::video(video_backend);
        if let Some(locator) = parse_locator(&lookup, "VIDEO_LOCATOR")? {
            video.locator = locator;
        }
        video.max_size_bytes = parse_ceiling(&lookup, "MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)?;

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));

        Ok(ServiceConfig {
            base,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            asset_root: lookup("ASSET_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./assets")),
            public_base_url,
            thumbnail,
            video,
            s3_bucket: lookup("S3_BUCKET"),
            s3_region: lookup("S3_REGION"),
            s3_endpoint: lookup("S3_ENDPOINT"),
            aws_region: lookup("AWS_REGION"),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        for slot in [&self.thumbnail, &self.video] {
            if slot.max_size_bytes == 0 {
                return Err(anyhow::anyhow!(
                    "Size ceiling for the {} slot must be greater than zero",
                    slot.slot
                ));
            }

            // Validate storage backend configuration
            match slot.backend {
                StorageBackend::S3 => {
                    if self.s3_bucket.is_none() {
                        return Err(anyhow::anyhow!(
                            "S3_BUCKET must be set when the {} slot uses the S3 storage backend",
                            slot.slot
                        ));
                    }
                    if self.s3_region.is_none() && self.aws_region.is_none() {
                        return Err(anyhow::anyhow!(
                            "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                        ));
                    }
                }
                StorageBackend::Memory | StorageBackend::Local | StorageBackend::DataUrl => {}
            }
        }

        Ok(())
    }
}

fn parse_backend<F>(lookup: &F, key: &str) -> Result<Option<StorageBackend>, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .parse::<StorageBackend>()
                .map_err(|e| anyhow::anyhow!("{}: {}", key, e))
        })
        .transpose()
}

fn parse_locator<F>(lookup: &F, key: &str) -> Result<Option<LocatorStrategy>, anyhow::Error>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .parse::<LocatorStrategy>()
                .map_err(|e| anyhow::anyhow!("{}: {}", key, e))
        })
        .transpose()
}
