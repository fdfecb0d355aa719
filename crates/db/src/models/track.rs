//! Track (faixa) entity model and DTOs.
//!
//! Each track moves through three production stages, recording, mix and
//! master, each `pending`, `in_progress` or `done`.

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::json_field::parse_json_field;
use labelops_core::progress::TrackStages;
use labelops_core::search::Searchable;
use labelops_core::status::validate_stage_status;
use labelops_core::types::{DbId, Timestamp};
use labelops_core::validation::{
    require_non_empty, require_non_empty_if_present, validate_http_url, validate_min_i32,
};
use labelops_core::youtube::extract_video_id;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw row from the `tracks` table. `composers` is JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct TrackRow {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub track_number: i32,
    pub duration_secs: Option<i32>,
    pub isrc: Option<String>,
    pub composers: Option<String>,
    pub recording_status: String,
    pub mix_status: String,
    pub master_status: String,
    pub youtube_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub track_number: i32,
    pub duration_secs: Option<i32>,
    pub isrc: Option<String>,
    #[serde(default)]
    pub composers: Vec<String>,
    pub recording_status: String,
    pub mix_status: String,
    pub master_status: String,
    pub youtube_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    // Derived on load; recomputed by `refresh_derived` after every change.
    #[serde(default)]
    pub youtube_id: Option<String>,
    #[serde(default)]
    pub progress_pct: f64,
    #[serde(default)]
    pub is_complete: bool,
}

impl Track {
    pub fn stages(&self) -> TrackStages<'_> {
        TrackStages {
            recording: &self.recording_status,
            mix: &self.mix_status,
            master: &self.master_status,
        }
    }

    pub fn refresh_derived(&mut self) {
        self.youtube_id = self.youtube_url.as_deref().and_then(extract_video_id);
        let stages = self.stages();
        let progress = stages.progress_pct();
        let complete = stages.is_complete();
        self.progress_pct = progress;
        self.is_complete = complete;
    }
}

impl From<TrackRow> for Track {
    fn from(row: TrackRow) -> Self {
        let mut track = Self {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            track_number: row.track_number,
            duration_secs: row.duration_secs,
            isrc: row.isrc,
            composers: parse_json_field(row.composers.as_deref()),
            recording_status: row.recording_status,
            mix_status: row.mix_status,
            master_status: row.master_status,
            youtube_url: row.youtube_url,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
            youtube_id: None,
            progress_pct: 0.0,
            is_complete: false,
        };
        track.refresh_derived();
        track
    }
}

impl Searchable for Track {
    fn search_fields(&self) -> Vec<Option<&str>> {
        let mut fields = vec![Some(self.title.as_str()), self.isrc.as_deref()];
        fields.extend(self.composers.iter().map(|c| Some(c.as_str())));
        fields
    }
}

/// Track fields without the owning project, used on its own inside a
/// composite project create and flattened into [`CreateTrack`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackDraft {
    pub title: String,
    /// Defaults to 1 if omitted.
    pub track_number: Option<i32>,
    pub duration_secs: Option<i32>,
    pub isrc: Option<String>,
    pub composers: Option<Vec<String>>,
    pub recording_status: Option<String>,
    pub mix_status: Option<String>,
    pub master_status: Option<String>,
    pub youtube_url: Option<String>,
    pub notes: Option<String>,
}

impl TrackDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("title", &self.title)?;
        validate_shape(
            self.track_number,
            self.duration_secs,
            [
                self.recording_status.as_deref(),
                self.mix_status.as_deref(),
                self.master_status.as_deref(),
            ],
            self.youtube_url.as_deref(),
        )
    }

    pub fn for_project(self, project_id: DbId) -> CreateTrack {
        CreateTrack {
            project_id,
            track: self,
        }
    }
}

/// DTO for creating a new track.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrack {
    pub project_id: DbId,
    #[serde(flatten)]
    pub track: TrackDraft,
}

impl CreateTrack {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.track.validate()
    }
}

/// DTO for updating an existing track. All fields are optional;
/// `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTrack {
    pub title: Option<String>,
    pub track_number: Option<i32>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub duration_secs: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub isrc: Option<Option<String>>,
    pub composers: Option<Vec<String>>,
    pub recording_status: Option<String>,
    pub mix_status: Option<String>,
    pub master_status: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub youtube_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub notes: Option<Option<String>>,
}

impl UpdateTrack {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("title", self.title.as_deref())?;
        validate_shape(
            self.track_number,
            self.duration_secs.flatten(),
            [
                self.recording_status.as_deref(),
                self.mix_status.as_deref(),
                self.master_status.as_deref(),
            ],
            nullable::value_str(&self.youtube_url),
        )
    }
}

fn validate_shape(
    track_number: Option<i32>,
    duration_secs: Option<i32>,
    stages: [Option<&str>; 3],
    youtube_url: Option<&str>,
) -> Result<(), CoreError> {
    if let Some(n) = track_number {
        validate_min_i32("track_number", n, 1)?;
    }
    if let Some(secs) = duration_secs {
        validate_min_i32("duration_secs", secs, 0)?;
    }
    for stage in stages.into_iter().flatten() {
        validate_stage_status(stage)?;
    }
    if let Some(url) = youtube_url.filter(|u| !u.trim().is_empty()) {
        validate_http_url("youtube_url", url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> TrackRow {
        TrackRow {
            id: 10,
            project_id: 2,
            title: "Chuva de Verão".into(),
            track_number: 1,
            duration_secs: Some(201),
            isrc: None,
            composers: Some(r#"["Ana","Bia"]"#.into()),
            recording_status: "done".into(),
            mix_status: "in_progress".into(),
            master_status: "pending".into(),
            youtube_url: Some("https://youtu.be/dQw4w9WgXcQ".into()),
            notes: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn derived_fields_are_computed_on_load() {
        let track = Track::from(row());
        assert_eq!(track.youtube_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(track.progress_pct, 50.0);
        assert!(!track.is_complete);
        assert_eq!(track.composers, vec!["Ana", "Bia"]);
    }

    #[test]
    fn refresh_tracks_status_changes() {
        let mut track = Track::from(row());
        track.mix_status = "done".into();
        track.master_status = "done".into();
        track.youtube_url = None;
        track.refresh_derived();
        assert!(track.is_complete);
        assert_eq!(track.progress_pct, 100.0);
        assert_eq!(track.youtube_id, None);
    }

    #[test]
    fn create_track_flattens_draft() {
        let input: CreateTrack = serde_json::from_value(serde_json::json!({
            "project_id": 4,
            "title": "Intro",
            "track_number": 1,
            "mix_status": "in_progress"
        }))
        .unwrap();
        assert_eq!(input.project_id, 4);
        assert_eq!(input.track.title, "Intro");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn invalid_shapes_are_rejected() {
        let mut draft = TrackDraft {
            title: "Outro".into(),
            ..TrackDraft::default()
        };
        assert!(draft.validate().is_ok());
        draft.track_number = Some(0);
        assert!(draft.validate().is_err());
        draft.track_number = Some(2);
        draft.master_status = Some("finished".into());
        assert!(draft.validate().is_err());
        draft.master_status = None;
        draft.youtube_url = Some("youtube".into());
        assert!(draft.validate().is_err());
    }
}
