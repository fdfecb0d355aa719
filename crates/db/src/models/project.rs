//! Project (production) entity model and DTOs.
//!
//! A project is a single, EP or album by one artist, made of tracks.

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::json_field::parse_json_field;
use labelops_core::search::Searchable;
use labelops_core::status::{validate_project_kind, validate_project_status};
use labelops_core::types::{Date, DbId, Timestamp};
use labelops_core::validation::{require_non_empty, require_non_empty_if_present};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::reference::ReferenceDraft;
use crate::models::track::TrackDraft;

/// Raw row from the `projects` table. `tags` is JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub artist_id: DbId,
    pub producer_id: Option<DbId>,
    pub title: String,
    pub kind: String,
    pub status: String,
    pub start_date: Option<Date>,
    pub target_release_date: Option<Date>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: DbId,
    pub artist_id: DbId,
    pub producer_id: Option<DbId>,
    pub title: String,
    pub kind: String,
    pub status: String,
    pub start_date: Option<Date>,
    pub target_release_date: Option<Date>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            artist_id: row.artist_id,
            producer_id: row.producer_id,
            title: row.title,
            kind: row.kind,
            status: row.status,
            start_date: row.start_date,
            target_release_date: row.target_release_date,
            notes: row.notes,
            tags: parse_json_field(row.tags.as_deref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<Option<&str>> {
        let mut fields = vec![
            Some(self.title.as_str()),
            Some(self.kind.as_str()),
            Some(self.status.as_str()),
            self.notes.as_deref(),
        ];
        fields.extend(self.tags.iter().map(|t| Some(t.as_str())));
        fields
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub artist_id: DbId,
    pub producer_id: Option<DbId>,
    pub title: String,
    pub kind: String,
    /// Defaults to `planning` if omitted.
    pub status: Option<String>,
    pub start_date: Option<Date>,
    pub target_release_date: Option<Date>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CreateProject {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("title", &self.title)?;
        validate_project_kind(&self.kind)?;
        if let Some(status) = &self.status {
            validate_project_status(status)?;
        }
        validate_dates(self.start_date, self.target_release_date)
    }
}

/// DTO for updating an existing project. All fields are optional;
/// `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub artist_id: Option<DbId>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub producer_id: Option<Option<DbId>>,
    pub title: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub target_release_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub notes: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl UpdateProject {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("title", self.title.as_deref())?;
        if let Some(kind) = &self.kind {
            validate_project_kind(kind)?;
        }
        if let Some(status) = &self.status {
            validate_project_status(status)?;
        }
        validate_dates(self.start_date.flatten(), self.target_release_date.flatten())
    }
}

/// A project together with its initial tracks and references, created in
/// one request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectComposite {
    pub project: CreateProject,
    #[serde(default)]
    pub tracks: Vec<TrackDraft>,
    #[serde(default)]
    pub references: Vec<ReferenceDraft>,
}

impl CreateProjectComposite {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.project.validate()?;
        for (i, track) in self.tracks.iter().enumerate() {
            track
                .validate()
                .map_err(|e| prefix_validation(&format!("tracks[{i}]"), e))?;
        }
        for (i, reference) in self.references.iter().enumerate() {
            reference
                .validate()
                .map_err(|e| prefix_validation(&format!("references[{i}]"), e))?;
        }
        Ok(())
    }
}

fn prefix_validation(path: &str, err: CoreError) -> CoreError {
    match err {
        CoreError::Validation(msg) => CoreError::Validation(format!("{path}: {msg}")),
        other => other,
    }
}

fn validate_dates(start: Option<Date>, target: Option<Date>) -> Result<(), CoreError> {
    match (start, target) {
        (Some(start), Some(target)) if target < start => Err(CoreError::Validation(
            "'target_release_date' must not be before 'start_date'".into(),
        )),
        _ => Ok(()),
    }
}
