//! Handlers for the `/artists` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::models::artist::{Artist, CreateArtist, UpdateArtist};
use labelops_db::repositories::ArtistRepo;

use crate::data_access;
use crate::error::AppResult;
use crate::query::{matches, ArtistListParams};
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// POST /api/v1/artists
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateArtist>,
) -> AppResult<(StatusCode, Json<Written<Artist>>)> {
    input.validate()?;
    let written =
        data_access::create::<Artist, _>(&state, &input, ArtistRepo::create(&state.pool, &input))
            .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/artists?q=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ArtistListParams>,
) -> AppResult<Json<Loaded<Vec<Artist>>>> {
    let loaded = data_access::load_all(&state, ArtistRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|artists| {
        let artists = artists
            .into_iter()
            .filter(|a| matches(params.status.as_deref(), a.status.as_str()))
            .collect();
        filter_rows(artists, params.q.as_deref())
    })))
}

/// GET /api/v1/artists/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Artist>>> {
    let loaded = data_access::load_one(&state, id, ArtistRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/artists/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArtist>,
) -> AppResult<(StatusCode, Json<Written<Artist>>)> {
    input.validate()?;
    let written = data_access::update::<Artist, _>(
        &state,
        id,
        &input,
        ArtistRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/artists/{id}
///
/// Removes the artist's projects and everything under them.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Artist, _, _>(&state, id, ArtistRepo::delete(&state.pool, id)).await
}
