//! ClipVault API Library
//!
//! This crate provides the HTTP surface of the media ingestion service: bearer
//! authentication, the upload and retrieval handlers, and application setup.

// Module declarations
mod handlers;
mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{MediaIngestService, UploadSource};
pub use state::{AppState, SlotState};
