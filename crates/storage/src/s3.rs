//! S3-compatible backend (AWS, MinIO, R2, Supabase storage, ...).

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::config::S3Settings;
use crate::error::check_key;
use crate::{join_url, ObjectStore, StorageError};

/// Stores objects in one bucket of an S3-compatible service.
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client with static credentials and path-style addressing, so
    /// self-hosted endpoints work without wildcard DNS.
    pub fn new(settings: &S3Settings, bucket: &str, public_base_url: &str) -> Self {
        let credentials = Credentials::new(
            settings.access_key_id.clone(),
            settings.secret_access_key.clone(),
            None,
            None,
            "labelops-env",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .endpoint_url(settings.endpoint.clone())
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();
        Self {
            client: Client::from_conf(config),
            bucket: bucket.to_string(),
            public_base_url: public_base_url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        check_key(key)?;
        let size = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(e).to_string()))?;
        tracing::debug!(bucket = %self.bucket, key, bytes = size, "Stored object in S3");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, &format!("{}/{key}", self.bucket))
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_includes_bucket() {
        let settings = S3Settings {
            endpoint: "http://localhost:9000".into(),
            region: "us-east-1".into(),
            access_key_id: "minio".into(),
            secret_access_key: "minio123".into(),
        };
        let store = S3ObjectStore::new(&settings, "labelops", "https://cdn.example.com/storage/");
        assert_eq!(
            store.public_url("documents/a.pdf"),
            "https://cdn.example.com/storage/labelops/documents/a.pdf"
        );
    }
}
