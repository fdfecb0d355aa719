//! Repository for the `attachments` table.

use labelops_core::status::{
    ATTACHMENT_OWNER_BUDGET, ATTACHMENT_OWNER_PAYMENT, ATTACHMENT_OWNER_PROJECT,
    ATTACHMENT_OWNER_RELEASE,
};
use labelops_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::attachment::{Attachment, CreateAttachment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_type, owner_id, file_name, storage_key, public_url, mime_type, \
                       size_bytes, created_at";

/// Which attachments go away with a deleted row.
#[derive(Debug, Clone, Copy)]
pub enum AttachmentScope {
    /// Attachments of one owner of the given `owner_type`.
    Owner(&'static str),
    /// Attachments of a project and of its payments, budget lines and releases.
    Project,
    /// The same for every project of an artist.
    Artist,
}

/// Provides create, list and delete operations for attachments.
pub struct AttachmentRepo;

impl AttachmentRepo {
    /// Insert the row for an object that has already been uploaded.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAttachment,
    ) -> Result<Attachment, sqlx::Error> {
        let query = format!(
            "INSERT INTO attachments (owner_type, owner_id, file_name, storage_key, public_url, \
                                      mime_type, size_bytes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(&input.owner_type)
            .bind(input.owner_id)
            .bind(&input.file_name)
            .bind(&input.storage_key)
            .bind(&input.public_url)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .fetch_one(pool)
            .await
    }

    /// Find an attachment by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Attachment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attachments WHERE id = $1");
        sqlx::query_as::<_, Attachment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the attachments of one owner, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_type: &str,
        owner_id: DbId,
    ) -> Result<Vec<Attachment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attachments \
             WHERE owner_type = $1 AND owner_id = $2 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Attachment>(&query)
            .bind(owner_type)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an attachment row. The caller removes the stored object.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "attachments", id).await
    }

    /// Delete the attachment rows in `scope` of row `id`, returning their
    /// storage keys so the caller can remove the objects.
    ///
    /// Runs before the owning row is deleted, inside the same transaction:
    /// attachments carry no foreign key, so nothing cascades to them.
    pub async fn delete_in_scope<'e, E: PgExecutor<'e>>(
        executor: E,
        scope: AttachmentScope,
        id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let projects = match scope {
            AttachmentScope::Owner(owner_type) => {
                return sqlx::query_scalar::<_, String>(
                    "DELETE FROM attachments WHERE owner_type = $1 AND owner_id = $2 \
                     RETURNING storage_key",
                )
                .bind(owner_type)
                .bind(id)
                .fetch_all(executor)
                .await;
            }
            AttachmentScope::Project => "SELECT id FROM projects WHERE id = $1",
            AttachmentScope::Artist => "SELECT id FROM projects WHERE artist_id = $1",
        };
        let query = format!(
            "WITH scope AS ({projects}) \
             DELETE FROM attachments \
             WHERE (owner_type = '{ATTACHMENT_OWNER_PROJECT}' \
                    AND owner_id IN (SELECT id FROM scope)) \
                OR (owner_type = '{ATTACHMENT_OWNER_PAYMENT}' AND owner_id IN \
                    (SELECT id FROM payments WHERE project_id IN (SELECT id FROM scope))) \
                OR (owner_type = '{ATTACHMENT_OWNER_BUDGET}' AND owner_id IN \
                    (SELECT id FROM budgets WHERE project_id IN (SELECT id FROM scope))) \
                OR (owner_type = '{ATTACHMENT_OWNER_RELEASE}' AND owner_id IN \
                    (SELECT id FROM releases WHERE project_id IN (SELECT id FROM scope))) \
             RETURNING storage_key"
        );
        sqlx::query_scalar::<_, String>(&query)
            .bind(id)
            .fetch_all(executor)
            .await
    }
}
