//! On-disk storage for uploaded files.

pub mod upload;

pub use upload::{StoredFile, UPLOADS_URL_PREFIX, UploadStorage};
