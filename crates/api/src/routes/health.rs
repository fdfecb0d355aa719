use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::FallbackMode;
use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers, `degraded` while serving from the
    /// local mirror.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database is reachable.
    pub db_healthy: bool,
    /// `local` or `strict`.
    pub fallback_mode: &'static str,
    pub storage_backend: &'static str,
}

/// GET /health -- returns service and database health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = labelops_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        fallback_mode: match state.config.fallback_mode {
            FallbackMode::Local => "local",
            FallbackMode::Strict => "strict",
        },
        storage_backend: state.store.backend_name(),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
