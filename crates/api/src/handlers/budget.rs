//! Handlers for the `/budgets` resource, the per-category budget upsert and
//! the project budget summary.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::finance::{settle_by_budget, sum_cents, BudgetFigures, Settled};
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::mirror::MirrorRecord;
use labelops_db::models::budget::{Budget, CreateBudget, UpdateBudget, UpsertBudget};
use labelops_db::models::payment::Payment;
use labelops_db::models::project::Project;
use labelops_db::repositories::{BudgetRepo, PaymentRepo, ProjectRepo};
use serde::Serialize;

use crate::data_access;
use crate::error::AppResult;
use crate::query::{matches, ProjectScopedParams};
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// One budget line with its realized figures.
#[derive(Debug, Serialize)]
pub struct BudgetLine {
    pub budget: Budget,
    pub figures: BudgetFigures,
}

/// Planned versus realized spending for one project.
#[derive(Debug, Serialize)]
pub struct BudgetSummary {
    pub project_id: DbId,
    pub lines: Vec<BudgetLine>,
    /// Payments of the project that belong to no budget line.
    pub unassigned: Settled,
    /// Sum of all lines against every payment of the project, unassigned
    /// ones included.
    pub totals: BudgetFigures,
}

/// Build the summary for `project_id` out of whole-table rows.
pub fn summarize(project_id: DbId, budgets: &[Budget], payments: &[Payment]) -> BudgetSummary {
    let payments: Vec<&Payment> = payments
        .iter()
        .filter(|p| p.project_id == project_id)
        .collect();
    let (by_budget, mut unassigned) = settle_by_budget(payments.iter().map(|p| p.figure()));

    let mut lines: Vec<BudgetLine> = budgets
        .iter()
        .filter(|b| b.project_id == project_id)
        .map(|budget| BudgetLine {
            figures: BudgetFigures::compute(
                budget.planned_cents,
                by_budget.get(&budget.id).copied().unwrap_or_default(),
            ),
            budget: budget.clone(),
        })
        .collect();
    lines.sort_by(|a, b| a.budget.category.cmp(&b.budget.category));

    // Payments pointing at a budget line of another project, or at one the
    // mirror no longer has, still count against the project.
    for (budget_id, settled) in &by_budget {
        if !lines.iter().any(|l| l.budget.id == *budget_id) {
            unassigned.absorb(*settled);
        }
    }

    let planned = sum_cents(lines.iter().map(|l| l.budget.planned_cents));
    let mut total = unassigned;
    for line in &lines {
        total.absorb(Settled {
            paid_cents: line.figures.paid_cents,
            pending_cents: line.figures.pending_cents,
        });
    }

    BudgetSummary {
        project_id,
        lines,
        unassigned,
        totals: BudgetFigures::compute(planned, total),
    }
}

/// POST /api/v1/budgets
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateBudget>,
) -> AppResult<(StatusCode, Json<Written<Budget>>)> {
    input.validate()?;
    let written =
        data_access::create::<Budget, _>(&state, &input, BudgetRepo::create(&state.pool, &input))
            .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/budgets?q=&project_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectScopedParams>,
) -> AppResult<Json<Loaded<Vec<Budget>>>> {
    let loaded = data_access::load_all(&state, BudgetRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|rows| {
        let rows = rows
            .into_iter()
            .filter(|b| matches(params.project_id.as_ref(), &b.project_id))
            .collect();
        filter_rows(rows, params.q.as_deref())
    })))
}

/// GET /api/v1/budgets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Budget>>> {
    let loaded =
        data_access::load_one(&state, id, BudgetRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/budgets/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBudget>,
) -> AppResult<(StatusCode, Json<Written<Budget>>)> {
    input.validate()?;
    let written = data_access::update::<Budget, _>(
        &state,
        id,
        &input,
        BudgetRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/budgets/{id}
///
/// Payments on the line stay, without a budget.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Budget, _, _>(&state, id, BudgetRepo::delete(&state.pool, id)).await
}

/// PUT /api/v1/projects/{project_id}/budgets/{category}
///
/// Inserts the line for the category or updates the existing one.
pub async fn upsert(
    State(state): State<AppState>,
    Path((project_id, category)): Path<(DbId, String)>,
    Json(input): Json<UpsertBudget>,
) -> AppResult<(StatusCode, Json<Written<Budget>>)> {
    input.validate()?;
    let input = input.into_create(project_id, category);
    input.validate()?;

    let written = data_access::write_or_fallback(
        &state,
        Budget::KIND,
        "upsert",
        BudgetRepo::upsert(&state.pool, &input),
        state.mirror.upsert_budget(&input),
    )
    .await?;
    if written.persisted {
        state.mirror.store(written.data.clone()).await;
    }
    Ok(written.with_status(StatusCode::OK))
}

/// GET /api/v1/projects/{project_id}/budget-summary
pub async fn summary(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Loaded<BudgetSummary>>> {
    let (project, budgets, payments) = tokio::join!(
        data_access::load_one::<Project, _>(
            &state,
            project_id,
            ProjectRepo::find_by_id(&state.pool, project_id)
        ),
        data_access::load_all(&state, BudgetRepo::list(&state.pool)),
        data_access::load_all(&state, PaymentRepo::list(&state.pool)),
    );
    // A missing project is a 404, even though only its id is needed.
    let (project, budgets, payments) = (project?, budgets?, payments?);

    let source = project
        .source
        .combine(budgets.source)
        .combine(payments.source);
    let summary = summarize(project_id, &budgets.data, &payments.data);
    Ok(Json(Loaded {
        data: summary,
        source,
    }))
}
