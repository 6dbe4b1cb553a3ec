//! Database repositories for data access layer
//!
//! `video` talks to Postgres; `memory` keeps records in process and backs local runs
//! without a database as well as tests.

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoRepository;
pub use video::{PgVideoRepository, VIDEO_COLUMNS};
