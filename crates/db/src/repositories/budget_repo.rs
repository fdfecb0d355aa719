//! Repository for the `budgets` table.

use labelops_core::nullable;
use labelops_core::status::ATTACHMENT_OWNER_BUDGET;
use labelops_core::types::DbId;
use sqlx::PgPool;

use crate::models::budget::{Budget, CreateBudget, UpdateBudget};
use crate::repositories::AttachmentScope;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, category, description, planned_cents, created_at, updated_at";

/// Provides CRUD and upsert operations for budget lines.
pub struct BudgetRepo;

impl BudgetRepo {
    /// Insert a new budget line. A second line for the same project and
    /// category violates `uq_budgets_project_category`.
    pub async fn create(pool: &PgPool, input: &CreateBudget) -> Result<Budget, sqlx::Error> {
        let query = format!(
            "INSERT INTO budgets (project_id, category, description, planned_cents) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(input.project_id)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.planned_cents)
            .fetch_one(pool)
            .await
    }

    /// Insert the line for (`project_id`, `category`) or update the existing one.
    ///
    /// A missing description keeps the stored one.
    pub async fn upsert(pool: &PgPool, input: &CreateBudget) -> Result<Budget, sqlx::Error> {
        let query = format!(
            "INSERT INTO budgets (project_id, category, description, planned_cents) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (project_id, category) DO UPDATE SET \
                description = COALESCE(EXCLUDED.description, budgets.description), \
                planned_cents = EXCLUDED.planned_cents, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(input.project_id)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.planned_cents)
            .fetch_one(pool)
            .await
    }

    /// Find a budget line by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Budget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM budgets WHERE id = $1");
        sqlx::query_as::<_, Budget>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all budget lines ordered by project, then category.
    pub async fn list(pool: &PgPool) -> Result<Vec<Budget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM budgets ORDER BY project_id, category");
        sqlx::query_as::<_, Budget>(&query).fetch_all(pool).await
    }

    /// Update a budget line. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBudget,
    ) -> Result<Option<Budget>, sqlx::Error> {
        let query = format!(
            "UPDATE budgets SET \
                category = COALESCE($2, category), \
                description = CASE WHEN $3 THEN $4 ELSE description END, \
                planned_cents = COALESCE($5, planned_cents), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Budget>(&query)
            .bind(id)
            .bind(&input.category)
            .bind(input.description.is_some())
            .bind(nullable::value_str(&input.description))
            .bind(input.planned_cents)
            .fetch_optional(pool)
            .await
    }

    /// Delete a budget line; its payments keep existing with `budget_id` NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let scope = AttachmentScope::Owner(ATTACHMENT_OWNER_BUDGET);
        super::delete_with_attachments(pool, "budgets", scope, id).await
    }
}
