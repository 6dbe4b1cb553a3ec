//! Upload validation
//!
//! Checks a raw multipart upload against the limits of the slot it targets. Validation is
//! pure: it never touches storage or the record store.

use bytes::Bytes;

use crate::config::SlotConfig;

/// Errors produced while validating an upload. All of them are client errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("Missing file in form field '{field}'")]
    MissingPayload { field: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge { size: u64, max: u64 },

    #[error("Missing Content-Type for file")]
    MissingMediaType,

    #[error("Unsupported media type: {media_type} (expected: {expected})")]
    UnsupportedMediaType { media_type: String, expected: String },
}

impl UploadError {
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::MissingPayload { .. } => "MISSING_PAYLOAD",
            UploadError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            UploadError::MissingMediaType => "MISSING_MEDIA_TYPE",
            UploadError::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::MissingPayload { .. } => "MissingPayload",
            UploadError::PayloadTooLarge { .. } => "PayloadTooLarge",
            UploadError::MissingMediaType => "MissingMediaType",
            UploadError::UnsupportedMediaType { .. } => "UnsupportedMediaType",
        }
    }

    pub fn suggested_action(&self) -> &'static str {
        match self {
            UploadError::MissingPayload { .. } => "Attach the file under the expected form field",
            UploadError::PayloadTooLarge { .. } => "Upload a smaller file",
            UploadError::MissingMediaType => "Set a Content-Type on the file part",
            UploadError::UnsupportedMediaType { .. } => "Convert the file to a supported format",
        }
    }
}

/// A file part as read off the wire, before any checks.
#[derive(Debug, Clone)]
pub struct RawUpload {
    pub file_name: Option<String>,
    pub media_type: Option<String>,
    pub data: Bytes,
}

/// An upload that passed every check for its slot.
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    pub data: Bytes,
    pub media_type: String,
    pub file_name: Option<String>,
}

impl ValidatedUpload {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Returns the `type/subtype` part of a media type, lower-cased, without parameters.
pub fn media_type_essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Per-slot upload validator
#[derive(Debug, Clone)]
pub struct UploadValidator {
    field: &'static str,
    max_size_bytes: u64,
    required_media_type: Option<String>,
}

impl UploadValidator {
    pub fn new(
        field: &'static str,
        max_size_bytes: u64,
        required_media_type: Option<String>,
    ) -> Self {
        Self {
            field,
            max_size_bytes,
            required_media_type: required_media_type.map(|t| media_type_essence(&t)),
        }
    }

    pub fn for_slot(slot: &SlotConfig) -> Self {
        Self::new(
            slot.slot.field_name(),
            slot.max_size_bytes,
            slot.required_media_type.clone(),
        )
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Checks run in a fixed order: presence, size, media type presence, media type match.
    pub fn validate(&self, upload: Option<RawUpload>) -> Result<ValidatedUpload, UploadError> {
        let upload = upload.ok_or_else(|| UploadError::MissingPayload {
            field: self.field.to_string(),
        })?;

        let size = upload.data.len() as u64;
        if size > self.max_size_bytes {
            return Err(UploadError::PayloadTooLarge {
                size,
                max: self.max_size_bytes,
            });
        }

        let media_type = upload
            .media_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(UploadError::MissingMediaType)?;

        if let Some(required) = &self.required_media_type {
            if media_type_essence(&media_type) != *required {
                return Err(UploadError::UnsupportedMediaType {
                    media_type,
                    expected: required.clone(),
                });
            }
        }

        Ok(ValidatedUpload {
            data: upload.data,
            media_type,
            file_name: upload.file_name,
        })
    }
}
