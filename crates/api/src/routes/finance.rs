//! Route definitions for `/budgets` and `/payments`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{budget, payment};
use crate::state::AppState;

/// Routes mounted at `/budgets`.
///
/// ```text
/// GET    /           -> list (?q=&project_id=)
/// POST   /           -> create
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn budget_router() -> Router<AppState> {
    Router::new()
        .route("/", get(budget::list).post(budget::create))
        .route(
            "/{id}",
            get(budget::get_by_id)
                .put(budget::update)
                .delete(budget::delete),
        )
}

/// Routes mounted at `/payments`.
///
/// ```text
/// GET    /           -> list (?q=&project_id=&budget_id=&status=)
/// POST   /           -> create
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update
/// DELETE /{id}       -> delete
/// ```
pub fn payment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(payment::list).post(payment::create))
        .route(
            "/{id}",
            get(payment::get_by_id)
                .put(payment::update)
                .delete(payment::delete),
        )
}
