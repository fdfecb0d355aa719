//! Repository for the `artists` table.

use labelops_core::json_field::to_json_field;
use labelops_core::nullable;
use labelops_core::types::DbId;
use sqlx::PgPool;

use crate::models::artist::{Artist, ArtistRow, CreateArtist, UpdateArtist};
use crate::repositories::AttachmentScope;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, stage_name, genre, email, phone, bio, photo_url, \
                       social_links, status, created_at, updated_at";

/// Provides CRUD operations for artists.
pub struct ArtistRepo;

impl ArtistRepo {
    /// Insert a new artist, returning the created row.
    ///
    /// If `status` is `None` in the input, defaults to `active`.
    pub async fn create(pool: &PgPool, input: &CreateArtist) -> Result<Artist, sqlx::Error> {
        let query = format!(
            "INSERT INTO artists (name, stage_name, genre, email, phone, bio, photo_url, \
                                  social_links, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'active')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ArtistRow>(&query)
            .bind(&input.name)
            .bind(&input.stage_name)
            .bind(&input.genre)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.bio)
            .bind(&input.photo_url)
            .bind(input.social_links.as_ref().map(to_json_field))
            .bind(&input.status)
            .fetch_one(pool)
            .await
            .map(Artist::from)
    }

    /// Find an artist by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists WHERE id = $1");
        let row = sqlx::query_as::<_, ArtistRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Artist::from))
    }

    /// List all artists ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Artist>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM artists ORDER BY name, id");
        let rows = sqlx::query_as::<_, ArtistRow>(&query).fetch_all(pool).await?;
        Ok(rows.into_iter().map(Artist::from).collect())
    }

    /// Update an artist. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateArtist,
    ) -> Result<Option<Artist>, sqlx::Error> {
        let query = format!(
            "UPDATE artists SET \
                name = COALESCE($2, name), \
                stage_name = CASE WHEN $3 THEN $4 ELSE stage_name END, \
                genre = CASE WHEN $5 THEN $6 ELSE genre END, \
                email = CASE WHEN $7 THEN $8 ELSE email END, \
                phone = CASE WHEN $9 THEN $10 ELSE phone END, \
                bio = CASE WHEN $11 THEN $12 ELSE bio END, \
                photo_url = CASE WHEN $13 THEN $14 ELSE photo_url END, \
                social_links = COALESCE($15, social_links), \
                status = COALESCE($16, status), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ArtistRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.stage_name.is_some())
            .bind(nullable::value_str(&input.stage_name))
            .bind(input.genre.is_some())
            .bind(nullable::value_str(&input.genre))
            .bind(input.email.is_some())
            .bind(nullable::value_str(&input.email))
            .bind(input.phone.is_some())
            .bind(nullable::value_str(&input.phone))
            .bind(input.bio.is_some())
            .bind(nullable::value_str(&input.bio))
            .bind(input.photo_url.is_some())
            .bind(nullable::value_str(&input.photo_url))
            .bind(input.social_links.as_ref().map(to_json_field))
            .bind(&input.status)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Artist::from))
    }

    /// Delete an artist and, through `ON DELETE CASCADE`, their projects.
    /// Attachments of those projects and their children are removed too;
    /// returns their storage keys, or `None` if the artist does not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        super::delete_with_attachments(pool, "artists", AttachmentScope::Artist, id).await
    }
}
