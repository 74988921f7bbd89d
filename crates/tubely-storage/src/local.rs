use crate::keys::validate_key;
use crate::traits::{ObjectReader, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Files are served by something in front of `base_url`; content types are
/// not persisted.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/tubely/assets")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:8091/assets")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path, refusing anything that could
    /// escape the base directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    async fn write_object(&self, path: &Path, mut reader: ObjectReader) -> StorageResult<u64> {
        let mut file = fs::File::create(path).await?;
        let size = tokio::io::copy(&mut reader, &mut file).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(size)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put_stream(
        &self,
        storage_key: &str,
        _content_type: &str,
        reader: ObjectReader,
    ) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        self.ensure_parent_dir(&path).await?;

        match self.write_object(&path, reader).await {
            Ok(size) => {
                tracing::info!(key = %storage_key, size_bytes = size, "Local stream upload successful");
                Ok(size)
            }
            Err(e) => {
                // Never leave a truncated object behind under the key.
                if let Err(cleanup_err) = fs::remove_file(&path).await {
                    tracing::debug!(error = %cleanup_err, key = %storage_key, "Failed to remove partial object");
                }
                tracing::error!(error = %e, key = %storage_key, "Local stream upload failed");
                Err(StorageError::UploadFailed(e.to_string()))
            }
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
