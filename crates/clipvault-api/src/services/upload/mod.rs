mod service;
mod source;

pub use service::MediaIngestService;
pub use source::UploadSource;
