//! Asset locators.
//!
//! A locator is the relative key an asset is stored under, `{stem}.{ext}`. The stem is
//! either 32 random bytes hex-encoded or the owning record id, see [`LocatorStrategy`].

use std::fmt::{Display, Formatter, Result as FmtResult};

use clipvault_core::{media_type_essence, LocatorStrategy};
use rand::RngCore;
use uuid::Uuid;

const RANDOM_STEM_BYTES: usize = 32;
const FALLBACK_EXTENSION: &str = "bin";

/// Relative storage key for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    key: String,
}

impl Locator {
    /// Fresh key from the OS-seeded CSPRNG. Collisions are not checked.
    pub fn randomized(media_type: &str) -> Self {
        let mut stem = [0u8; RANDOM_STEM_BYTES];
        rand::rng().fill_bytes(&mut stem);
        Self {
            key: format!("{}.{}", hex::encode(stem), extension_for(media_type)),
        }
    }

    /// `{record_id}.{ext}`; a second upload for the same record lands on the same key.
    pub fn record_keyed(record_id: Uuid, media_type: &str) -> Self {
        Self {
            key: format!("{}.{}", record_id, extension_for(media_type)),
        }
    }

    pub fn derive(strategy: LocatorStrategy, record_id: Uuid, media_type: &str) -> Self {
        match strategy {
            LocatorStrategy::Randomized => Self::randomized(media_type),
            LocatorStrategy::RecordKeyed => Self::record_keyed(record_id, media_type),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl Display for Locator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.key)
    }
}

/// File extension for a media type: the subtype, lower-cased, reduced to `[a-z0-9]`.
///
/// `image/svg+xml` becomes `svgxml`. Anything without a usable subtype maps to `bin`.
pub fn extension_for(media_type: &str) -> String {
    let essence = media_type_essence(media_type);
    let extension: String = essence
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();

    if extension.is_empty() {
        FALLBACK_EXTENSION.to_string()
    } else {
        extension
    }
}
