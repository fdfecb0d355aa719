//! Repository for the `tracks` table.

use labelops_core::json_field::to_json_field;
use labelops_core::nullable;
use labelops_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::track::{CreateTrack, Track, TrackRow, UpdateTrack};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, track_number, duration_secs, isrc, composers, \
                       recording_status, mix_status, master_status, youtube_url, notes, \
                       created_at, updated_at";

/// Provides CRUD operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track, returning the created row. Stage statuses default
    /// to `pending` and the track number to 1.
    pub async fn create<'e, E>(executor: E, input: &CreateTrack) -> Result<Track, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let track = &input.track;
        let query = format!(
            "INSERT INTO tracks (project_id, title, track_number, duration_secs, isrc, composers, \
                                 recording_status, mix_status, master_status, youtube_url, notes) \
             VALUES ($1, $2, COALESCE($3, 1), $4, $5, $6, \
                     COALESCE($7, 'pending'), COALESCE($8, 'pending'), COALESCE($9, 'pending'), \
                     $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TrackRow>(&query)
            .bind(input.project_id)
            .bind(&track.title)
            .bind(track.track_number)
            .bind(track.duration_secs)
            .bind(&track.isrc)
            .bind(track.composers.as_ref().map(to_json_field))
            .bind(&track.recording_status)
            .bind(&track.mix_status)
            .bind(&track.master_status)
            .bind(&track.youtube_url)
            .bind(&track.notes)
            .fetch_one(executor)
            .await
            .map(Track::from)
    }

    /// Find a track by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        let row = sqlx::query_as::<_, TrackRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Track::from))
    }

    /// List all tracks ordered by project, then track number.
    pub async fn list(pool: &PgPool) -> Result<Vec<Track>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tracks ORDER BY project_id, track_number, id");
        let rows = sqlx::query_as::<_, TrackRow>(&query).fetch_all(pool).await?;
        Ok(rows.into_iter().map(Track::from).collect())
    }

    /// Update a track. Absent fields keep their value; nullable
    /// fields sent as `null` are cleared.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTrack,
    ) -> Result<Option<Track>, sqlx::Error> {
        let query = format!(
            "UPDATE tracks SET \
                title = COALESCE($2, title), \
                track_number = COALESCE($3, track_number), \
                duration_secs = CASE WHEN $4 THEN $5 ELSE duration_secs END, \
                isrc = CASE WHEN $6 THEN $7 ELSE isrc END, \
                composers = COALESCE($8, composers), \
                recording_status = COALESCE($9, recording_status), \
                mix_status = COALESCE($10, mix_status), \
                master_status = COALESCE($11, master_status), \
                youtube_url = CASE WHEN $12 THEN $13 ELSE youtube_url END, \
                notes = CASE WHEN $14 THEN $15 ELSE notes END, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TrackRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.track_number)
            .bind(input.duration_secs.is_some())
            .bind(input.duration_secs.flatten())
            .bind(input.isrc.is_some())
            .bind(nullable::value_str(&input.isrc))
            .bind(input.composers.as_ref().map(to_json_field))
            .bind(&input.recording_status)
            .bind(&input.mix_status)
            .bind(&input.master_status)
            .bind(input.youtube_url.is_some())
            .bind(nullable::value_str(&input.youtube_url))
            .bind(input.notes.is_some())
            .bind(nullable::value_str(&input.notes))
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Track::from))
    }

    /// Delete a track by id.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        super::delete_by_id(pool, "tracks", id).await
    }
}
