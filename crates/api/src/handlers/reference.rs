//! Handlers for the `/references` resource (listening references attached
//! to a project).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::models::reference::{CreateReference, Reference, UpdateReference};
use labelops_db::repositories::ReferenceRepo;

use crate::data_access;
use crate::error::AppResult;
use crate::query::{matches, ProjectScopedParams};
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// POST /api/v1/references
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateReference>,
) -> AppResult<(StatusCode, Json<Written<Reference>>)> {
    input.validate()?;
    let written = data_access::create::<Reference, _>(
        &state,
        &input,
        ReferenceRepo::create(&state.pool, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/references?q=&project_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectScopedParams>,
) -> AppResult<Json<Loaded<Vec<Reference>>>> {
    let loaded = data_access::load_all(&state, ReferenceRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|rows| {
        let rows = rows
            .into_iter()
            .filter(|r| matches(params.project_id.as_ref(), &r.project_id))
            .collect();
        filter_rows(rows, params.q.as_deref())
    })))
}

/// GET /api/v1/references/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Reference>>> {
    let loaded =
        data_access::load_one(&state, id, ReferenceRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/references/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateReference>,
) -> AppResult<(StatusCode, Json<Written<Reference>>)> {
    input.validate()?;
    let written = data_access::update::<Reference, _>(
        &state,
        id,
        &input,
        ReferenceRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/references/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Reference, _, _>(&state, id, ReferenceRepo::delete(&state.pool, id)).await
}
