//! Object storage for uploaded documents and attachments.
//!
//! [`ObjectStore`] is the port the api crate talks to. Two backends:
//!
//! - [`LocalObjectStore`]: a directory on disk, served by the api under
//!   `/files`
//! - [`S3ObjectStore`]: any S3-compatible endpoint, path-style addressing
//!
//! Keys are built by `labelops_core::storage` and validated here before
//! anything touches the backend.

mod config;
mod error;
mod local;
mod s3;

use std::sync::Arc;

pub use config::{S3Settings, StorageBackend, StorageConfig};
pub use error::StorageError;
pub use local::LocalObjectStore;
pub use s3::S3ObjectStore;

/// Port for putting and removing objects and turning keys into public URLs.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    /// Remove the object under `key`. Removing a missing object succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// The URL clients use to download the object.
    fn public_url(&self, key: &str) -> String;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}

/// Build the configured backend.
pub fn build_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    let store: Arc<dyn ObjectStore> = match config.backend {
        StorageBackend::Local => Arc::new(LocalObjectStore::new(
            config.local_dir.clone(),
            &config.public_base_url,
        )),
        StorageBackend::S3 => {
            let settings = config.s3.as_ref().ok_or_else(|| {
                StorageError::NotConfigured("STORAGE_BACKEND=s3 requires the S3_* variables".into())
            })?;
            Arc::new(S3ObjectStore::new(
                settings,
                &config.bucket,
                &config.public_base_url,
            ))
        }
    };
    tracing::info!(backend = store.backend_name(), "Object store ready");
    Ok(store)
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    impl std::fmt::Debug for dyn ObjectStore {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ObjectStore")
                .field("backend", &self.backend_name())
                .finish()
        }
    }

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("http://x/files/", "/a/b.pdf"), "http://x/files/a/b.pdf");
        assert_eq!(join_url("http://x/files", "a.pdf"), "http://x/files/a.pdf");
    }

    #[test]
    fn s3_backend_without_settings_is_rejected() {
        let config = StorageConfig {
            backend: StorageBackend::S3,
            bucket: "labelops".into(),
            public_base_url: "http://localhost:9000".into(),
            local_dir: "./data".into(),
            s3: None,
        };
        assert_matches!(build_store(&config), Err(StorageError::NotConfigured(_)));
    }
}
