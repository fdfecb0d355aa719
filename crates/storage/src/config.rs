use std::path::PathBuf;
use std::str::FromStr;

/// Which [`ObjectStore`](crate::ObjectStore) implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Local,
    S3,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Connection settings for an S3-compatible endpoint.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Object storage configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Bucket name; also the first path segment of S3 public URLs.
    pub bucket: String,
    /// Base of every public URL handed to clients.
    pub public_base_url: String,
    /// Root directory of the local backend.
    pub local_dir: PathBuf,
    /// Present only when all `S3_*` variables are set.
    pub s3: Option<S3Settings>,
}

impl StorageConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                        |
    /// |---------------------------|--------------------------------|
    /// | `STORAGE_BACKEND`         | `local`                        |
    /// | `STORAGE_BUCKET`          | `labelops`                     |
    /// | `STORAGE_PUBLIC_BASE_URL` | `http://localhost:3000/files`  |
    /// | `STORAGE_LOCAL_DIR`       | `./data/storage`               |
    /// | `S3_ENDPOINT`, `S3_REGION`, `S3_ACCESS_KEY_ID`, `S3_SECRET_ACCESS_KEY` | unset |
    pub fn from_env() -> Self {
        let backend: StorageBackend = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .parse()
            .expect("STORAGE_BACKEND must be 'local' or 's3'");

        let bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "labelops".into());

        let public_base_url = std::env::var("STORAGE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/files".into());

        let local_dir = std::env::var("STORAGE_LOCAL_DIR")
            .unwrap_or_else(|_| "./data/storage".into())
            .into();

        let s3 = match (
            std::env::var("S3_ENDPOINT"),
            std::env::var("S3_ACCESS_KEY_ID"),
            std::env::var("S3_SECRET_ACCESS_KEY"),
        ) {
            (Ok(endpoint), Ok(access_key_id), Ok(secret_access_key)) => Some(S3Settings {
                endpoint,
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        Self {
            backend,
            bucket,
            public_base_url,
            local_dir,
            s3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!("local".parse::<StorageBackend>(), Ok(StorageBackend::Local));
        assert_eq!(" S3 ".parse::<StorageBackend>(), Ok(StorageBackend::S3));
        assert!("gcs".parse::<StorageBackend>().is_err());
    }
}
