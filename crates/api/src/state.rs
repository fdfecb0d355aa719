use std::sync::Arc;

use labelops_db::mirror::LocalMirror;
use labelops_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (lazily connected).
    pub pool: labelops_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Last known copy of every table, answering while the database is down.
    pub mirror: Arc<LocalMirror>,
    /// Where uploaded documents and attachments go.
    pub store: Arc<dyn ObjectStore>,
}
