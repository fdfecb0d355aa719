//! Handlers for the `/tracks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::models::track::{CreateTrack, Track, UpdateTrack};
use labelops_db::repositories::TrackRepo;

use crate::data_access;
use crate::error::AppResult;
use crate::query::{matches, ProjectScopedParams};
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// POST /api/v1/tracks
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateTrack>,
) -> AppResult<(StatusCode, Json<Written<Track>>)> {
    input.validate()?;
    let written =
        data_access::create::<Track, _>(&state, &input, TrackRepo::create(&state.pool, &input))
            .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/tracks?q=&project_id=
///
/// Ordered by project, then track number.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectScopedParams>,
) -> AppResult<Json<Loaded<Vec<Track>>>> {
    let loaded = data_access::load_all(&state, TrackRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|tracks| {
        let mut tracks: Vec<Track> = tracks
            .into_iter()
            .filter(|t| matches(params.project_id.as_ref(), &t.project_id))
            .collect();
        tracks.sort_by_key(|t| (t.project_id, t.track_number, t.id));
        filter_rows(tracks, params.q.as_deref())
    })))
}

/// GET /api/v1/tracks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Track>>> {
    let loaded = data_access::load_one(&state, id, TrackRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/tracks/{id}
///
/// Progress and the YouTube id are recomputed from the stored row.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTrack>,
) -> AppResult<(StatusCode, Json<Written<Track>>)> {
    input.validate()?;
    let written = data_access::update::<Track, _>(
        &state,
        id,
        &input,
        TrackRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/tracks/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Track, _, _>(&state, id, TrackRepo::delete(&state.pool, id)).await
}
