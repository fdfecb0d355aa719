#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The remote backend rejected or failed the request.
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Storage not configured: {0}")]
    NotConfigured(String),
}

/// Validate `key` with the shared key rules.
pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    labelops_core::storage::validate_object_key(key)
        .map_err(|_| StorageError::InvalidKey(key.to_string()))
}
