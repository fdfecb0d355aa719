//! Handlers for the `/producers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::models::producer::{CreateProducer, Producer, UpdateProducer};
use labelops_db::repositories::ProducerRepo;

use crate::data_access;
use crate::error::AppResult;
use crate::query::SearchParams;
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// POST /api/v1/producers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProducer>,
) -> AppResult<(StatusCode, Json<Written<Producer>>)> {
    input.validate()?;
    let written = data_access::create::<Producer, _>(
        &state,
        &input,
        ProducerRepo::create(&state.pool, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/producers?q=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Loaded<Vec<Producer>>>> {
    let loaded = data_access::load_all(&state, ProducerRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|rows| filter_rows(rows, params.q.as_deref()))))
}

/// GET /api/v1/producers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Producer>>> {
    let loaded =
        data_access::load_one(&state, id, ProducerRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/producers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProducer>,
) -> AppResult<(StatusCode, Json<Written<Producer>>)> {
    input.validate()?;
    let written = data_access::update::<Producer, _>(
        &state,
        id,
        &input,
        ProducerRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/producers/{id}
///
/// Projects and payments that named the producer keep going without one.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Producer, _, _>(&state, id, ProducerRepo::delete(&state.pool, id)).await
}
