//! Repository for the `documents` table.

use labelops_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::{CreateDocument, Document, UpdateDocument};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, category, artist_id, project_id, storage_key, public_url, \
                       mime_type, size_bytes, checksum_sha256, created_at";

/// Provides CRUD operations for stored documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert the row for an object that has already been uploaded.
    pub async fn create(pool: &PgPool, input: &CreateDocument) -> Result<Document, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (name, category, artist_id, project_id, storage_key, \
                                    public_url, mime_type, size_bytes, checksum_sha256) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.artist_id)
            .bind(input.project_id)
            .bind(&input.storage_key)
            .bind(&input.public_url)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(&input.checksum_sha256)
            .fetch_one(pool)
            .await
    }

    /// Find a document by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all documents, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Document>(&query).fetch_all(pool).await
    }

    /// Update a document's metadata. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateDocument,
    ) -> Result<Option<Document>, sqlx::Error> {
        let query = format!(
            "UPDATE documents SET \
                name = COALESCE($2, name), \
                category = COALESCE($3, category), \
                artist_id = COALESCE($4, artist_id), \
                project_id = COALESCE($5, project_id) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.artist_id)
            .bind(input.project_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a document row. The caller removes the stored object.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "documents", id).await
    }
}
