//! Tubely Storage Library
//!
//! Object-store abstraction used by the upload pipeline, with S3 and local
//! filesystem implementations.
//!
//! # Storage key format
//!
//! Videos are namespaced by orientation: `{landscape|portrait|other}/{token}.{ext}`,
//! where `token` is a fresh random identifier per upload. Keys must not contain
//! `..` or a leading `/`. Key generation lives in the `keys` module so every
//! backend sees the same layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{build_storage_key, generate_token};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectReader, Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
