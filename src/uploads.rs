//! Transient storage for uploaded documents.
//!
//! Client filenames are never used as paths. Each upload is written under a fresh key made of a
//! UUID and a sanitized copy of the name, and the file is removed when its [`StoredUpload`]
//! handle is dropped.

use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const FALLBACK_NAME: &str = "upload.pdf";
const MAX_NAME_BYTES: usize = 100;

/// Directory-backed store for uploads that live only as long as the request.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`. The directory is created on first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding in-flight uploads.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `bytes` under a storage key derived from `filename`.
    pub async fn store(&self, filename: Option<&str>, bytes: &[u8]) -> io::Result<StoredUpload> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let key = format!(
            "{}-{}",
            Uuid::new_v4(),
            sanitize_filename(filename.unwrap_or(FALLBACK_NAME))
        );
        let path = self.dir.join(key);
        let upload = StoredUpload { path };
        tokio::fs::write(&upload.path, bytes).await?;
        tracing::debug!(path = %upload.path.display(), bytes = bytes.len(), "Stored upload");
        Ok(upload)
    }
}

/// Handle to a stored upload; the file is deleted when the handle drops.
#[derive(Debug)]
pub struct StoredUpload {
    path: PathBuf,
}

impl StoredUpload {
    /// Location of the stored file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed upload"),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "Failed to remove upload");
            }
        }
    }
}

/// Reduce a client-supplied filename to a safe single path component.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    sanitized = sanitized.trim_start_matches('.').to_string();
    // Only ASCII remains, so byte truncation stays on a char boundary.
    sanitized.truncate(MAX_NAME_BYTES);

    if sanitized.chars().any(|c| c.is_ascii_alphanumeric()) {
        sanitized
    } else {
        FALLBACK_NAME.to_string()
    }
}
