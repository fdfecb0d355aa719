use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use labelops_db::PoolSettings;

/// What a write does when the database cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackMode {
    /// Apply the write to the local mirror and answer `202 Accepted`.
    Local,
    /// Refuse the write with `503 PERSISTENCE_UNAVAILABLE`.
    Strict,
}

impl FromStr for FallbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown fallback mode '{other}'")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may take to drain on shutdown.
    pub shutdown_timeout_secs: u64,
    pub db_max_connections: u32,
    /// Also the time a request waits before falling back to the mirror.
    pub db_acquire_timeout_ms: u64,
    pub run_migrations: bool,
    pub fallback_mode: FallbackMode,
    /// Mock dataset seeding the mirror; the embedded one when unset.
    pub fallback_dataset_path: Option<PathBuf>,
    /// Largest accepted upload body.
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `DB_MAX_CONNECTIONS`    | `10`                       |
    /// | `DB_ACQUIRE_TIMEOUT_MS` | `3000`                     |
    /// | `RUN_MIGRATIONS`        | `true`                     |
    /// | `FALLBACK_MODE`         | `local`                    |
    /// | `FALLBACK_DATASET_PATH` | unset (embedded dataset)   |
    /// | `MAX_UPLOAD_BYTES`      | `26214400` (25 MiB)        |
    /// | `LOG_FORMAT`            | `pretty`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("DB_MAX_CONNECTIONS must be a valid u32");

        let db_acquire_timeout_ms: u64 = std::env::var("DB_ACQUIRE_TIMEOUT_MS")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("DB_ACQUIRE_TIMEOUT_MS must be a valid u64");

        let run_migrations: bool = std::env::var("RUN_MIGRATIONS")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("RUN_MIGRATIONS must be 'true' or 'false'");

        let fallback_mode: FallbackMode = std::env::var("FALLBACK_MODE")
            .unwrap_or_else(|_| "local".into())
            .parse()
            .expect("FALLBACK_MODE must be 'local' or 'strict'");

        let fallback_dataset_path = std::env::var("FALLBACK_DATASET_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "26214400".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let log_format: LogFormat = std::env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".into())
            .parse()
            .expect("LOG_FORMAT must be 'pretty' or 'json'");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            db_max_connections,
            db_acquire_timeout_ms,
            run_migrations,
            fallback_mode,
            fallback_dataset_path,
            max_upload_bytes,
            log_format,
        }
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_millis(self.db_acquire_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse() {
        assert_eq!("LOCAL".parse::<FallbackMode>(), Ok(FallbackMode::Local));
        assert_eq!("strict".parse::<FallbackMode>(), Ok(FallbackMode::Strict));
        assert!("offline".parse::<FallbackMode>().is_err());
        assert_eq!("json".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Pretty));
    }
}
