//! Filesystem storage backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use super::{CartStorage, StorageError};

/// Filesystem-based storage backend.
///
/// Each key becomes `<base>/<percent-encoded key>.json`, so keys such as
/// `@RocketShoes:cart` are safe on every platform.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new filesystem backend rooted at `base_path`.
    ///
    /// The directory is created on first write.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory holding the slots.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a storage key to a filesystem path.
    #[must_use]
    pub fn key_to_path(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.json", urlencoding::encode(key)))
    }

    fn io_error(key: &str, source: std::io::Error) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            source,
        }
    }
}

impl CartStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_to_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(key, e)),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| Self::io_error(key, e))?;

        let path = self.key_to_path(key);
        let tmp_path = path.with_extension("json.tmp");

        // Write then rename so a crash never leaves a truncated slot behind
        fs::write(&tmp_path, value)
            .await
            .map_err(|e| Self::io_error(key, e))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| Self::io_error(key, e))?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "Wrote storage slot");
        Ok(())
    }
}
