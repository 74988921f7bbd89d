//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Byte source handed to [`Storage::put_stream`].
pub type ObjectReader = Pin<Box<dyn AsyncRead + Send + Unpin>>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) implement this trait so the
/// upload pipeline never couples to a specific transport.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream `reader` to `storage_key` until EOF, attaching `content_type` as
    /// object metadata where the backend supports it.
    ///
    /// Returns the number of bytes written. On failure no complete object is
    /// left under `storage_key`.
    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        reader: ObjectReader,
    ) -> StorageResult<u64>;

    /// Publicly resolvable URL for an object stored under `storage_key`.
    fn public_url(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
