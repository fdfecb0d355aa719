//! Route definitions for `/suppliers` and `/producers`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{producer, supplier};
use crate::state::AppState;

/// Routes mounted at `/suppliers`.
pub fn supplier_router() -> Router<AppState> {
    Router::new()
        .route("/", get(supplier::list).post(supplier::create))
        .route(
            "/{id}",
            get(supplier::get_by_id)
                .put(supplier::update)
                .delete(supplier::delete),
        )
}

/// Routes mounted at `/producers`.
pub fn producer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(producer::list).post(producer::create))
        .route(
            "/{id}",
            get(producer::get_by_id)
                .put(producer::update)
                .delete(producer::delete),
        )
}
