//! Storage key derivation.
//!
//! Key format: `{orientation-directory}{token}.{extension}`, e.g.
//! `landscape/Zq3...8w.mp4`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use tubely_core::Orientation;

use crate::traits::{StorageError, StorageResult};

const TOKEN_BYTES: usize = 32;

/// Generate a fresh URL-safe random token (32 bytes of entropy).
pub fn generate_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the object key for an upload of the given orientation.
pub fn build_storage_key(orientation: Orientation, token: &str, extension: &str) -> String {
    format!("{}{}.{}", orientation.directory(), token, extension)
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
