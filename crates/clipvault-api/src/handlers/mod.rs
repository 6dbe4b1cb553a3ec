pub mod asset_get;
pub mod asset_upload;
