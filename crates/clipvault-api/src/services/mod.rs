pub mod upload;

pub use upload::{MediaIngestService, UploadSource};
