//! Data models for the application
//!
//! Records that assets attach to, the slots an asset can fill, and the
//! identity of the caller performing an upload.

mod slot;
mod video;

pub use slot::*;
pub use video::*;
