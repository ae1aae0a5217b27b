//! Startup errors of the server binary.

use std::io;

use thiserror::Error;

use crate::domain::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to open message store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to create upload directory: {0}")]
    UploadDir(#[source] io::Error),

    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
