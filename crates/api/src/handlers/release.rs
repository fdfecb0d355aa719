//! Handlers for the `/releases` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::models::release::{CreateRelease, Release, UpdateRelease};
use labelops_db::repositories::ReleaseRepo;

use crate::data_access;
use crate::error::AppResult;
use crate::query::{matches, ProjectScopedParams};
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// POST /api/v1/releases
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRelease>,
) -> AppResult<(StatusCode, Json<Written<Release>>)> {
    input.validate()?;
    let written =
        data_access::create::<Release, _>(&state, &input, ReleaseRepo::create(&state.pool, &input))
            .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/releases?q=&project_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectScopedParams>,
) -> AppResult<Json<Loaded<Vec<Release>>>> {
    let loaded = data_access::load_all(&state, ReleaseRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|releases| {
        let releases = releases
            .into_iter()
            .filter(|r| matches(params.project_id.as_ref(), &r.project_id))
            .collect();
        filter_rows(releases, params.q.as_deref())
    })))
}

/// GET /api/v1/releases/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Release>>> {
    let loaded =
        data_access::load_one(&state, id, ReleaseRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/releases/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRelease>,
) -> AppResult<(StatusCode, Json<Written<Release>>)> {
    input.validate()?;
    let written = data_access::update::<Release, _>(
        &state,
        id,
        &input,
        ReleaseRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/releases/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Release, _, _>(&state, id, ReleaseRepo::delete(&state.pool, id)).await
}
