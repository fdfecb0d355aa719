//! Repository for the `projects` table.

use labelops_core::json_field::to_json_field;
use labelops_core::nullable;
use labelops_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::project::{
    CreateProject, CreateProjectComposite, Project, ProjectRow, UpdateProject,
};
use crate::models::reference::Reference;
use crate::models::track::Track;
use crate::repositories::{AttachmentScope, ReferenceRepo, TrackRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, artist_id, producer_id, title, kind, status, start_date, \
                       target_release_date, notes, tags, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `planning`.
    pub async fn create<'e, E>(executor: E, input: &CreateProject) -> Result<Project, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO projects (artist_id, producer_id, title, kind, status, start_date, \
                                   target_release_date, notes, tags) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'planning'), $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(input.artist_id)
            .bind(input.producer_id)
            .bind(&input.title)
            .bind(&input.kind)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.target_release_date)
            .bind(&input.notes)
            .bind(input.tags.as_ref().map(to_json_field))
            .fetch_one(executor)
            .await
            .map(Project::from)
    }

    /// Insert a project with its tracks and references in one transaction.
    ///
    /// Either everything is written or nothing is.
    pub async fn create_composite(
        pool: &PgPool,
        input: &CreateProjectComposite,
    ) -> Result<(Project, Vec<Track>, Vec<Reference>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = Self::create(&mut *tx, &input.project).await?;

        let mut tracks = Vec::with_capacity(input.tracks.len());
        for draft in &input.tracks {
            let create = draft.clone().for_project(project.id);
            tracks.push(TrackRepo::create(&mut *tx, &create).await?);
        }

        let mut references = Vec::with_capacity(input.references.len());
        for draft in &input.references {
            let create = draft.clone().for_project(project.id);
            references.push(ReferenceRepo::create(&mut *tx, &create).await?);
        }

        tx.commit().await?;
        Ok((project, tracks, references))
    }

    /// Find a project by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Project::from))
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, ProjectRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    /// Update a project. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET \
                artist_id = COALESCE($2, artist_id), \
                producer_id = CASE WHEN $3 THEN $4 ELSE producer_id END, \
                title = COALESCE($5, title), \
                kind = COALESCE($6, kind), \
                status = COALESCE($7, status), \
                start_date = CASE WHEN $8 THEN $9 ELSE start_date END, \
                target_release_date = CASE WHEN $10 THEN $11 ELSE target_release_date END, \
                notes = CASE WHEN $12 THEN $13 ELSE notes END, \
                tags = COALESCE($14, tags), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .bind(input.artist_id)
            .bind(input.producer_id.is_some())
            .bind(input.producer_id.flatten())
            .bind(&input.title)
            .bind(&input.kind)
            .bind(&input.status)
            .bind(input.start_date.is_some())
            .bind(input.start_date.flatten())
            .bind(input.target_release_date.is_some())
            .bind(input.target_release_date.flatten())
            .bind(input.notes.is_some())
            .bind(nullable::value_str(&input.notes))
            .bind(input.tags.as_ref().map(to_json_field))
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Project::from))
    }

    /// Delete a project; tracks, references, budgets, payments and releases
    /// go with it through `ON DELETE CASCADE`, and the attachments of the
    /// project and of those children are removed in the same transaction.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        super::delete_with_attachments(pool, "projects", AttachmentScope::Project, id).await
    }
}
