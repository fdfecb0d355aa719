//! Persistence for the label operations backend.
//!
//! - [`models`]: row structs and create/update DTOs, one module per table
//! - [`repositories`]: zero-sized structs with async CRUD methods over `&PgPool`
//! - [`mirror`]: the in-memory last-known copy of every table, used when the
//!   database cannot be reached

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod mirror;
pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Connection pool tuning read from the environment by the api crate.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// How long a query waits for a connection before giving up. This is
    /// also how long a request waits before falling back to the mirror.
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_millis(3000),
        }
    }
}

/// Create a connection pool without connecting.
///
/// The server has to come up while the database is down so that reads can be
/// served from the mirror; connections are opened on first use.
pub fn create_lazy_pool(database_url: &str, settings: &PoolSettings) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_lazy(database_url)
}

/// Run a trivial query to confirm the database answers.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// True when the error means the database could not be reached or the
/// connection broke, as opposed to the database answering with an error.
///
/// Only these errors trigger the mirror fallback; constraint violations and
/// missing rows are real answers.
pub fn is_unavailable(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::WorkerCrashed
    )
}
