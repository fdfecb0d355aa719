//! Handlers for the `/suppliers` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};
use labelops_db::repositories::SupplierRepo;

use crate::data_access;
use crate::error::AppResult;
use crate::query::SearchParams;
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// POST /api/v1/suppliers
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateSupplier>,
) -> AppResult<(StatusCode, Json<Written<Supplier>>)> {
    input.validate()?;
    let written = data_access::create::<Supplier, _>(
        &state,
        &input,
        SupplierRepo::create(&state.pool, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/suppliers?q=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Loaded<Vec<Supplier>>>> {
    let loaded = data_access::load_all(&state, SupplierRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|rows| filter_rows(rows, params.q.as_deref()))))
}

/// GET /api/v1/suppliers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Supplier>>> {
    let loaded =
        data_access::load_one(&state, id, SupplierRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/suppliers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSupplier>,
) -> AppResult<(StatusCode, Json<Written<Supplier>>)> {
    input.validate()?;
    let written = data_access::update::<Supplier, _>(
        &state,
        id,
        &input,
        SupplierRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/suppliers/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Supplier, _, _>(&state, id, SupplierRepo::delete(&state.pool, id)).await
}
