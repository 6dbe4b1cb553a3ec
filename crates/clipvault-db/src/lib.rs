//! ClipVault Database Layer
//!
//! This crate provides the video record store: a repository trait plus a Postgres
//! implementation and an in-process one.
//!
// Module declarations
pub mod db;
pub mod repository_traits;

// Re-exports: Repositories
pub use db::{InMemoryVideoRepository, PgVideoRepository};

// Re-exports: Repository traits
pub use repository_traits::VideoRepository;
