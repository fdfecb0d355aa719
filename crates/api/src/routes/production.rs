//! Route definitions for the project children: `/tracks`, `/references`
//! and `/releases`. Each list takes `?q=&project_id=`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{reference, release, track};
use crate::state::AppState;

/// Routes mounted at `/tracks`.
pub fn track_router() -> Router<AppState> {
    Router::new()
        .route("/", get(track::list).post(track::create))
        .route(
            "/{id}",
            get(track::get_by_id).put(track::update).delete(track::delete),
        )
}

/// Routes mounted at `/references`.
pub fn reference_router() -> Router<AppState> {
    Router::new()
        .route("/", get(reference::list).post(reference::create))
        .route(
            "/{id}",
            get(reference::get_by_id)
                .put(reference::update)
                .delete(reference::delete),
        )
}

/// Routes mounted at `/releases`.
pub fn release_router() -> Router<AppState> {
    Router::new()
        .route("/", get(release::list).post(release::create))
        .route(
            "/{id}",
            get(release::get_by_id)
                .put(release::update)
                .delete(release::delete),
        )
}
