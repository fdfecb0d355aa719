//! Repository for the `producers` table.

use labelops_core::nullable;
use labelops_core::types::DbId;
use sqlx::PgPool;

use crate::models::producer::{CreateProducer, Producer, UpdateProducer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, specialty, email, phone, fee_cents, notes, created_at, updated_at";

/// Provides CRUD operations for producers.
pub struct ProducerRepo;

impl ProducerRepo {
    /// Insert a new producer, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProducer) -> Result<Producer, sqlx::Error> {
        let query = format!(
            "INSERT INTO producers (name, specialty, email, phone, fee_cents, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Producer>(&query)
            .bind(&input.name)
            .bind(&input.specialty)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.fee_cents)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a producer by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Producer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM producers WHERE id = $1");
        sqlx::query_as::<_, Producer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all producers ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Producer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM producers ORDER BY name, id");
        sqlx::query_as::<_, Producer>(&query).fetch_all(pool).await
    }

    /// Update a producer. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProducer,
    ) -> Result<Option<Producer>, sqlx::Error> {
        let query = format!(
            "UPDATE producers SET \
                name = COALESCE($2, name), \
                specialty = CASE WHEN $3 THEN $4 ELSE specialty END, \
                email = CASE WHEN $5 THEN $6 ELSE email END, \
                phone = CASE WHEN $7 THEN $8 ELSE phone END, \
                fee_cents = CASE WHEN $9 THEN $10 ELSE fee_cents END, \
                notes = CASE WHEN $11 THEN $12 ELSE notes END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Producer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.specialty.is_some())
            .bind(nullable::value_str(&input.specialty))
            .bind(input.email.is_some())
            .bind(nullable::value_str(&input.email))
            .bind(input.phone.is_some())
            .bind(nullable::value_str(&input.phone))
            .bind(input.fee_cents.is_some())
            .bind(input.fee_cents.flatten())
            .bind(input.notes.is_some())
            .bind(nullable::value_str(&input.notes))
            .fetch_optional(pool)
            .await
    }

    /// Delete a producer; projects and payments keep existing with the
    /// producer cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "producers", id).await
    }
}
