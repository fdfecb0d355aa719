//! Repository for the `project_references` table.

use labelops_core::nullable;
use labelops_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::reference::{CreateReference, Reference, UpdateReference};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, artist_name, url, notes, created_at";

/// Provides CRUD operations for project references.
pub struct ReferenceRepo;

impl ReferenceRepo {
    /// Insert a new reference, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreateReference,
    ) -> Result<Reference, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let reference = &input.reference;
        let query = format!(
            "INSERT INTO project_references (project_id, title, artist_name, url, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reference>(&query)
            .bind(input.project_id)
            .bind(&reference.title)
            .bind(&reference.artist_name)
            .bind(&reference.url)
            .bind(&reference.notes)
            .fetch_one(executor)
            .await
            .map(Reference::with_derived)
    }

    /// Find a reference by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Reference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_references WHERE id = $1");
        let row = sqlx::query_as::<_, Reference>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Reference::with_derived))
    }

    /// List all references, oldest first within each project.
    pub async fn list(pool: &PgPool) -> Result<Vec<Reference>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_references ORDER BY project_id, created_at, id"
        );
        let rows = sqlx::query_as::<_, Reference>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Reference::with_derived).collect())
    }

    /// Update a reference. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReference,
    ) -> Result<Option<Reference>, sqlx::Error> {
        let query = format!(
            "UPDATE project_references SET \
                title = COALESCE($2, title), \
                artist_name = CASE WHEN $3 THEN $4 ELSE artist_name END, \
                url = COALESCE($5, url), \
                notes = CASE WHEN $6 THEN $7 ELSE notes END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, Reference>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.artist_name.is_some())
            .bind(nullable::value_str(&input.artist_name))
            .bind(&input.url)
            .bind(input.notes.is_some())
            .bind(nullable::value_str(&input.notes))
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Reference::with_derived))
    }

    /// Delete a reference by id.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "project_references", id).await
    }
}
