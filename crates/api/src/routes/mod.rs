pub mod artist;
pub mod files;
pub mod finance;
pub mod health;
pub mod partner;
pub mod production;
pub mod project;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /artists                           list, create
/// /artists/{id}                      get, update, delete
///
/// /projects                          list, create
/// /projects/composite                create with tracks and references
/// /projects/{id}                     get, update, delete
/// /projects/{id}/detail              project page
/// /projects/{id}/budget-summary      planned vs realized
/// /projects/{id}/budgets/{category}  budget upsert (PUT)
///
/// /tracks, /references, /releases    CRUD, ?project_id=
/// /budgets, /payments                CRUD, ?project_id=
/// /suppliers, /producers             CRUD
///
/// /documents                         list, upload (multipart)
/// /documents/{id}                    get, update metadata, delete
/// /attachments                       list by owner, upload (multipart)
/// /attachments/{id}                  delete
///
/// /dashboard/overview                counts, finance, overdue, upcoming
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/artists", artist::router())
        .nest("/projects", project::router())
        .nest("/tracks", production::track_router())
        .nest("/references", production::reference_router())
        .nest("/releases", production::release_router())
        .nest("/budgets", finance::budget_router())
        .nest("/payments", finance::payment_router())
        .nest("/suppliers", partner::supplier_router())
        .nest("/producers", partner::producer_router())
        .nest("/documents", files::document_router())
        .nest("/attachments", files::attachment_router())
        .route("/dashboard/overview", get(handlers::dashboard::overview))
}
