use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// This enum names the four interchangeable asset storage strategies. A backend is
/// chosen per asset slot once, at startup, and never per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Process-wide in-memory table keyed by record id, served back by the API.
    Memory,
    /// Permanent files under the configured asset root.
    Local,
    /// Local staging file handed to an S3-compatible object store, then removed.
    S3,
    /// No storage at all: the payload is embedded in a `data:` URL.
    DataUrl,
}

impl StorageBackend {
    /// Whether bytes stored by this backend can be read back through the API.
    pub fn serves_bytes(&self) -> bool {
        matches!(self, StorageBackend::Memory)
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "local" => Ok(StorageBackend::Local),
            "s3" => Ok(StorageBackend::S3),
            "data_url" | "data-url" | "dataurl" => Ok(StorageBackend::DataUrl),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Local => write!(f, "local"),
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::DataUrl => write!(f, "data_url"),
        }
    }
}

/// How the storage key for an upload is derived.
///
/// The two strategies have different overwrite semantics and are kept apart on purpose:
/// `Randomized` produces a fresh key per upload, `RecordKeyed` reuses `{record_id}.{ext}`
/// so a re-upload replaces the previous object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorStrategy {
    Randomized,
    RecordKeyed,
}

impl FromStr for LocatorStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" | "randomized" => Ok(LocatorStrategy::Randomized),
            "record" | "record_keyed" => Ok(LocatorStrategy::RecordKeyed),
            _ => Err(anyhow::anyhow!("Invalid locator strategy: {}", s)),
        }
    }
}

impl Display for LocatorStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LocatorStrategy::Randomized => write!(f, "randomized"),
            LocatorStrategy::RecordKeyed => write!(f, "record_keyed"),
        }
    }
}
