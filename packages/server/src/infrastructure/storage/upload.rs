//! Upload directory management.
//!
//! Files are stored as `<uuid v4><original extension>` so uploads never
//! collide and the client-supplied name never becomes a path.

use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};

/// URL prefix uploaded files are served under
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// A file that has been written to the upload directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Absolute URL path, e.g. `/uploads/6f2c...e1.txt`
    pub url: String,
    pub path: PathBuf,
    pub size_bytes: u64,
}

#[derive(Debug, Clone)]
pub struct UploadStorage {
    dir: PathBuf,
}

impl UploadStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory (and parents) if it is missing.
    pub async fn init(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Write `contents` under a fresh name keeping the extension of `original_name`.
    pub async fn save(&self, original_name: &str, contents: &[u8]) -> io::Result<StoredFile> {
        let stored_name = format!("{}{}", uuid::Uuid::new_v4(), extension_of(original_name));
        let path = self.dir.join(&stored_name);

        let mut file = fs::File::create(&path).await?;
        file.write_all(contents).await?;
        file.flush().await?;
        let size_bytes = file.metadata().await?.len();

        tracing::debug!(path = %path.display(), size_bytes, "stored upload");
        Ok(StoredFile {
            url: format!("{UPLOADS_URL_PREFIX}/{stored_name}"),
            path,
            size_bytes,
        })
    }
}

/// `.ext` of the final path component, or an empty string
fn extension_of(original_name: &str) -> String {
    // browsers may send a full Windows path
    let file_name = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}
