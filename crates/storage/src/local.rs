//! Filesystem backend.

use std::path::{Path, PathBuf};

use crate::error::check_key;
use crate::{join_url, ObjectStore, StorageError};

/// Stores objects as files under a root directory.
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `key`. The key must already be validated.
    fn path_for(&self, key: &str) -> PathBuf {
        key.split('/').fold(self.root.clone(), |path, seg| path.join(seg))
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        check_key(key)?;
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &data).await?;
        tracing::debug!(key, bytes = data.len(), "Stored object on disk");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        check_key(key)?;
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
