//! Repository for the `suppliers` table.

use labelops_core::nullable;
use labelops_core::types::DbId;
use sqlx::PgPool;

use crate::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, service_type, contact_name, email, phone, tax_id, notes, \
                       created_at, updated_at";

/// Provides CRUD operations for suppliers.
pub struct SupplierRepo;

impl SupplierRepo {
    /// Insert a new supplier, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSupplier) -> Result<Supplier, sqlx::Error> {
        let query = format!(
            "INSERT INTO suppliers (name, service_type, contact_name, email, phone, tax_id, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(&input.name)
            .bind(&input.service_type)
            .bind(&input.contact_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.tax_id)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a supplier by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Supplier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM suppliers WHERE id = $1");
        sqlx::query_as::<_, Supplier>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all suppliers ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Supplier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM suppliers ORDER BY name, id");
        sqlx::query_as::<_, Supplier>(&query).fetch_all(pool).await
    }

    /// Update a supplier. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSupplier,
    ) -> Result<Option<Supplier>, sqlx::Error> {
        let query = format!(
            "UPDATE suppliers SET \
                name = COALESCE($2, name), \
                service_type = CASE WHEN $3 THEN $4 ELSE service_type END, \
                contact_name = CASE WHEN $5 THEN $6 ELSE contact_name END, \
                email = CASE WHEN $7 THEN $8 ELSE email END, \
                phone = CASE WHEN $9 THEN $10 ELSE phone END, \
                tax_id = CASE WHEN $11 THEN $12 ELSE tax_id END, \
                notes = CASE WHEN $13 THEN $14 ELSE notes END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Supplier>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.service_type.is_some())
            .bind(nullable::value_str(&input.service_type))
            .bind(input.contact_name.is_some())
            .bind(nullable::value_str(&input.contact_name))
            .bind(input.email.is_some())
            .bind(nullable::value_str(&input.email))
            .bind(input.phone.is_some())
            .bind(nullable::value_str(&input.phone))
            .bind(input.tax_id.is_some())
            .bind(nullable::value_str(&input.tax_id))
            .bind(input.notes.is_some())
            .bind(nullable::value_str(&input.notes))
            .fetch_optional(pool)
            .await
    }

    /// Delete a supplier; payments keep existing with `supplier_id` NULL.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "suppliers", id).await
    }
}
