//! Repository for the `payments` table.

use chrono::Utc;
use labelops_core::finance::resolve_paid_on;
use labelops_core::nullable;
use labelops_core::status::{ATTACHMENT_OWNER_PAYMENT, PAYMENT_STATUS_PENDING};
use labelops_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment::{CreatePayment, Payment, UpdatePayment};
use crate::repositories::AttachmentScope;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, budget_id, supplier_id, producer_id, description, \
                       amount_cents, status, due_date, paid_on, method, created_at, updated_at";

/// Provides CRUD operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a new payment. Status defaults to `pending`; a payment created
    /// as `paid` without a date is stamped with today.
    pub async fn create(pool: &PgPool, input: &CreatePayment) -> Result<Payment, sqlx::Error> {
        let status = input.status.as_deref().unwrap_or(PAYMENT_STATUS_PENDING);
        let paid_on = resolve_paid_on(status, input.paid_on, Utc::now().date_naive());
        let query = format!(
            "INSERT INTO payments (project_id, budget_id, supplier_id, producer_id, description, \
                                   amount_cents, status, due_date, paid_on, method) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.project_id)
            .bind(input.budget_id)
            .bind(input.supplier_id)
            .bind(input.producer_id)
            .bind(&input.description)
            .bind(input.amount_cents)
            .bind(status)
            .bind(input.due_date)
            .bind(paid_on)
            .bind(&input.method)
            .fetch_one(pool)
            .await
    }

    /// Find a payment by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all payments, soonest due first; undated payments last.
    pub async fn list(pool: &PgPool) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments ORDER BY due_date ASC NULLS LAST, created_at DESC, id"
        );
        sqlx::query_as::<_, Payment>(&query).fetch_all(pool).await
    }

    /// Update a payment. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    ///
    /// Switching to `paid` keeps the resulting `paid_on`, or stamps today when
    /// there is none.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET \
                budget_id = CASE WHEN $2 THEN $3 ELSE budget_id END, \
                supplier_id = CASE WHEN $4 THEN $5 ELSE supplier_id END, \
                producer_id = CASE WHEN $6 THEN $7 ELSE producer_id END, \
                description = COALESCE($8, description), \
                amount_cents = COALESCE($9, amount_cents), \
                status = COALESCE($10, status), \
                due_date = CASE WHEN $11 THEN $12 ELSE due_date END, \
                paid_on = CASE \
                    WHEN $10 = 'paid' \
                        THEN COALESCE(CASE WHEN $13 THEN $14 ELSE paid_on END, CURRENT_DATE) \
                    WHEN $13 THEN $14 \
                    ELSE paid_on END, \
                method = CASE WHEN $15 THEN $16 ELSE method END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(input.budget_id.is_some())
            .bind(input.budget_id.flatten())
            .bind(input.supplier_id.is_some())
            .bind(input.supplier_id.flatten())
            .bind(input.producer_id.is_some())
            .bind(input.producer_id.flatten())
            .bind(&input.description)
            .bind(input.amount_cents)
            .bind(&input.status)
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(input.paid_on.is_some())
            .bind(input.paid_on.flatten())
            .bind(input.method.is_some())
            .bind(nullable::value_str(&input.method))
            .fetch_optional(pool)
            .await
    }

    /// Delete a payment and its attachments. Returns the attachments'
    /// storage keys, or `None` if the payment does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let scope = AttachmentScope::Owner(ATTACHMENT_OWNER_PAYMENT);
        super::delete_with_attachments(pool, "payments", scope, id).await
    }
}
