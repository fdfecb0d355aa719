//! Route definitions for the `/projects` resource.
//!
//! Also mounts the project-scoped budget upsert and summary.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{budget, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                            -> list (?q=&artist_id=&status=&kind=)
/// POST   /                            -> create
/// POST   /composite                   -> create_composite
/// GET    /{id}                        -> get_by_id
/// PUT    /{id}                        -> update
/// DELETE /{id}                        -> delete
/// GET    /{id}/detail                 -> detail
///
/// GET    /{id}/budget-summary         -> budget::summary
/// PUT    /{id}/budgets/{category}     -> budget::upsert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/composite", post(project::create_composite))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/detail", get(project::detail))
        .route("/{id}/budget-summary", get(budget::summary))
        .route("/{id}/budgets/{category}", put(budget::upsert))
}
