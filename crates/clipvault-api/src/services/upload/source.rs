//! Reading the uploaded file out of a request body

use async_trait::async_trait;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::BytesMut;
use clipvault_core::{AppError, RawUpload, UploadError};

/// Where the ingest flow pulls the uploaded file from.
///
/// Implementations return `Ok(None)` when the named field is absent, or present but not
/// a file. They must not buffer more than `max_size_bytes` of payload.
#[async_trait]
pub trait UploadSource: Send {
    async fn read_file(
        self,
        field_name: &str,
        max_size_bytes: u64,
    ) -> Result<Option<RawUpload>, AppError>;
}

fn too_large(size: u64, max: u64) -> AppError {
    UploadError::PayloadTooLarge { size, max }.into()
}

/// The transport body limit surfaces as a multipart error; report it as an oversized
/// payload. `size` is then only a lower bound.
fn multipart_error(err: MultipartError, seen: u64, max: u64) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(seen.max(max.saturating_add(1)), max);
    }
    AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
}

#[async_trait]
impl UploadSource for Multipart {
    async fn read_file(
        mut self,
        field_name: &str,
        max_size_bytes: u64,
    ) -> Result<Option<RawUpload>, AppError> {
        while let Some(mut field) = self
            .next_field()
            .await
            .map_err(|e| multipart_error(e, 0, max_size_bytes))?
        {
            if field.name() != Some(field_name) {
                continue;
            }

            // A plain form value under the file's name is treated as no file at all.
            let Some(file_name) = field.file_name().map(str::to_string) else {
                return Ok(None);
            };
            let media_type = field.content_type().map(str::to_string);

            let mut data = BytesMut::new();
            loop {
                let chunk = field
                    .chunk()
                    .await
                    .map_err(|e| multipart_error(e, data.len() as u64, max_size_bytes))?;
                let Some(chunk) = chunk else { break };

                let size = (data.len() + chunk.len()) as u64;
                if size > max_size_bytes {
                    return Err(too_large(size, max_size_bytes));
                }
                data.extend_from_slice(&chunk);
            }

            tracing::debug!(
                field = field_name,
                file_name = %file_name,
                size = data.len(),
                "Read upload from multipart body"
            );

            return Ok(Some(RawUpload {
                file_name: Some(file_name),
                media_type,
                data: data.freeze(),
            }));
        }

        Ok(None)
    }
}

/// An upload that is already in memory, e.g. produced by a test or another service.
#[async_trait]
impl UploadSource for Option<RawUpload> {
    async fn read_file(
        self,
        _field_name: &str,
        _max_size_bytes: u64,
    ) -> Result<Option<RawUpload>, AppError> {
        Ok(self)
    }
}
