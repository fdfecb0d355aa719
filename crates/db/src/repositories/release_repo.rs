//! Repository for the `releases` table.

use labelops_core::json_field::to_json_field;
use labelops_core::nullable;
use labelops_core::status::{ATTACHMENT_OWNER_RELEASE, RELEASE_STATUS_SCHEDULED};
use labelops_core::types::DbId;
use sqlx::PgPool;

use crate::models::release::{CreateRelease, Release, ReleaseRow, UpdateRelease};
use crate::repositories::AttachmentScope;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, release_date, status, distributor, upc, platforms, \
                       cover_url, created_at, updated_at";

/// Provides CRUD operations for releases.
pub struct ReleaseRepo;

impl ReleaseRepo {
    /// Insert a new release. Status defaults to `scheduled`.
    pub async fn create(pool: &PgPool, input: &CreateRelease) -> Result<Release, sqlx::Error> {
        let query = format!(
            "INSERT INTO releases (project_id, title, release_date, status, distributor, upc, \
                                   platforms, cover_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(input.release_date)
            .bind(input.status.as_deref().unwrap_or(RELEASE_STATUS_SCHEDULED))
            .bind(&input.distributor)
            .bind(&input.upc)
            .bind(input.platforms.as_ref().map(to_json_field))
            .bind(&input.cover_url)
            .fetch_one(pool)
            .await
            .map(Release::from)
    }

    /// Find a release by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Release>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM releases WHERE id = $1");
        let row = sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Release::from))
    }

    /// List all releases by date; undated releases last.
    pub async fn list(pool: &PgPool) -> Result<Vec<Release>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM releases ORDER BY release_date ASC NULLS LAST, id"
        );
        let rows = sqlx::query_as::<_, ReleaseRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Release::from).collect())
    }

    /// Update a release. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRelease,
    ) -> Result<Option<Release>, sqlx::Error> {
        let query = format!(
            "UPDATE releases SET \
                title = COALESCE($2, title), \
                release_date = CASE WHEN $3 THEN $4 ELSE release_date END, \
                status = COALESCE($5, status), \
                distributor = CASE WHEN $6 THEN $7 ELSE distributor END, \
                upc = CASE WHEN $8 THEN $9 ELSE upc END, \
                platforms = COALESCE($10, platforms), \
                cover_url = CASE WHEN $11 THEN $12 ELSE cover_url END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReleaseRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.release_date.is_some())
            .bind(input.release_date.flatten())
            .bind(&input.status)
            .bind(input.distributor.is_some())
            .bind(nullable::value_str(&input.distributor))
            .bind(input.upc.is_some())
            .bind(nullable::value_str(&input.upc))
            .bind(input.platforms.as_ref().map(to_json_field))
            .bind(input.cover_url.is_some())
            .bind(nullable::value_str(&input.cover_url))
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Release::from))
    }

    /// Delete a release and its attachments.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let scope = AttachmentScope::Owner(ATTACHMENT_OWNER_RELEASE);
        super::delete_with_attachments(pool, "releases", scope, id).await
    }
}
