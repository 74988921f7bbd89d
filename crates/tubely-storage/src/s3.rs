use crate::keys::validate_key;
use crate::traits::{ObjectReader, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
    public_url: Option<String>,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:4566" for LocalStack, "http://localhost:9000" for MinIO)
    /// * `public_url` - Optional base URL used for public locators instead of the derived one
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        public_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store: Arc::new(store),
            bucket,
            region,
            endpoint_url,
            public_url,
        })
    }

    /// Generate public URL for S3 object
    ///
    /// An explicit public URL wins. Otherwise S3-compatible endpoints use
    /// path-style `{endpoint}/{bucket}/{key}` and AWS uses
    /// `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref public_url) = self.public_url {
            format!("{}/{}", public_url.trim_end_matches('/'), key)
        } else if let Some(ref endpoint) = self.endpoint_url {
            format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        mut reader: ObjectReader,
    ) -> StorageResult<u64> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        // Multipart upload under the hood; nothing is visible under the key
        // until shutdown completes it.
        let mut writer = BufWriter::new(self.store.clone(), Path::from(storage_key))
            .with_attributes(attributes);

        let result = match tokio::io::copy(&mut reader, &mut writer).await {
            Ok(size) => writer.shutdown().await.map(|_| size),
            Err(e) => Err(e),
        };

        match result {
            Ok(size) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    content_type = %content_type,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload successful"
                );
                Ok(size)
            }
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        key = %storage_key,
                        "Failed to abort S3 multipart upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload failed"
                );
                Err(StorageError::UploadFailed(e.to_string()))
            }
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(endpoint: Option<&str>, public_url: Option<&str>) -> S3Storage {
        S3Storage::new(
            "tubely-videos".to_string(),
            "us-east-1".to_string(),
            endpoint.map(String::from),
            public_url.map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn test_aws_url() {
        let s3 = storage(None, None);
        assert_eq!(
            s3.public_url("landscape/abc.mp4"),
            "https://tubely-videos.s3.us-east-1.amazonaws.com/landscape/abc.mp4"
        );
    }

    #[test]
    fn test_custom_endpoint_uses_path_style() {
        let s3 = storage(Some("http://localhost:4566/"), None);
        assert_eq!(
            s3.public_url("portrait/abc.mp4"),
            "http://localhost:4566/tubely-videos/portrait/abc.mp4"
        );
    }

    #[test]
    fn test_public_url_override() {
        let s3 = storage(
            Some("http://localhost:4566"),
            Some("http://tubely-videos.s3.localhost.localstack.cloud:4566"),
        );
        assert_eq!(
            s3.public_url("other/abc.mp4"),
            "http://tubely-videos.s3.localhost.localstack.cloud:4566/other/abc.mp4"
        );
        assert_eq!(s3.backend_type(), StorageBackend::S3);
    }
}
