//! Handlers for the `/payments` resource.
//!
//! Marking a payment `paid` without a `paid_on` date stamps it with today,
//! both in the database and in the mirror.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::models::payment::{CreatePayment, Payment, UpdatePayment};
use labelops_db::repositories::PaymentRepo;

use crate::data_access;
use crate::error::AppResult;
use crate::query::{matches, matches_opt, PaymentListParams};
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// POST /api/v1/payments
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePayment>,
) -> AppResult<(StatusCode, Json<Written<Payment>>)> {
    input.validate()?;
    let written =
        data_access::create::<Payment, _>(&state, &input, PaymentRepo::create(&state.pool, &input))
            .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/payments?q=&project_id=&budget_id=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaymentListParams>,
) -> AppResult<Json<Loaded<Vec<Payment>>>> {
    let loaded = data_access::load_all(&state, PaymentRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|payments| {
        let payments = payments
            .into_iter()
            .filter(|p| matches(params.project_id.as_ref(), &p.project_id))
            .filter(|p| matches_opt(params.budget_id, p.budget_id))
            .filter(|p| matches(params.status.as_deref(), p.status.as_str()))
            .collect();
        filter_rows(payments, params.q.as_deref())
    })))
}

/// GET /api/v1/payments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Payment>>> {
    let loaded =
        data_access::load_one(&state, id, PaymentRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/payments/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePayment>,
) -> AppResult<(StatusCode, Json<Written<Payment>>)> {
    input.validate()?;
    let written = data_access::update::<Payment, _>(
        &state,
        id,
        &input,
        PaymentRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/payments/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Payment, _, _>(&state, id, PaymentRepo::delete(&state.pool, id)).await
}
