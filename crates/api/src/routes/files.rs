//! Route definitions for `/documents` and `/attachments`.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{attachment, document};
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /           -> list (?q=&category=&artist_id=&project_id=)
/// POST   /           -> upload (multipart)
/// GET    /{id}       -> get_by_id
/// PUT    /{id}       -> update (metadata)
/// DELETE /{id}       -> delete (row and stored file)
/// ```
pub fn document_router() -> Router<AppState> {
    Router::new()
        .route("/", get(document::list).post(document::upload))
        .route(
            "/{id}",
            get(document::get_by_id)
                .put(document::update)
                .delete(document::delete),
        )
}

/// Routes mounted at `/attachments`.
///
/// ```text
/// GET    /           -> list (?owner_type=&owner_id=, both required)
/// POST   /           -> upload (multipart)
/// DELETE /{id}       -> delete (row and stored file)
/// ```
pub fn attachment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(attachment::list).post(attachment::upload))
        .route("/{id}", delete(attachment::delete))
}
