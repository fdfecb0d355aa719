//! Musical reference entity model and DTOs.
//!
//! References are links (usually YouTube) the team collects for a project.
//! Stored in the `project_references` table.

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::search::Searchable;
use labelops_core::types::{DbId, Timestamp};
use labelops_core::validation::{
    require_non_empty, require_non_empty_if_present, validate_http_url,
};
use labelops_core::youtube::extract_video_id;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Reference {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub artist_name: Option<String>,
    pub url: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    /// Derived from `url`; `None` for non-YouTube links.
    #[sqlx(skip)]
    #[serde(default)]
    pub youtube_id: Option<String>,
}

impl Reference {
    pub fn refresh_derived(&mut self) {
        self.youtube_id = extract_video_id(&self.url);
    }

    /// Consume a freshly fetched row and fill in derived fields.
    pub fn with_derived(mut self) -> Self {
        self.refresh_derived();
        self
    }
}

impl Searchable for Reference {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.artist_name.as_deref(),
            self.notes.as_deref(),
        ]
    }
}

/// Reference fields without the owning project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceDraft {
    pub title: String,
    pub artist_name: Option<String>,
    pub url: String,
    pub notes: Option<String>,
}

impl ReferenceDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("title", &self.title)?;
        require_non_empty("url", &self.url)?;
        validate_http_url("url", &self.url)
    }

    pub fn for_project(self, project_id: DbId) -> CreateReference {
        CreateReference {
            project_id,
            reference: self,
        }
    }
}

/// DTO for creating a new reference.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReference {
    pub project_id: DbId,
    #[serde(flatten)]
    pub reference: ReferenceDraft,
}

impl CreateReference {
    pub fn validate(&self) -> Result<(), CoreError> {
        self.reference.validate()
    }
}

/// DTO for updating an existing reference. All fields are optional;
/// `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReference {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub artist_name: Option<Option<String>>,
    pub url: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub notes: Option<Option<String>>,
}

impl UpdateReference {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("title", self.title.as_deref())?;
        if let Some(url) = &self.url {
            validate_http_url("url", url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_id_derived_from_url() {
        let reference = Reference {
            id: 1,
            project_id: 1,
            title: "Timbre".into(),
            artist_name: Some("Banda".into()),
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
            notes: None,
            created_at: chrono::Utc::now(),
            youtube_id: None,
        }
        .with_derived();
        assert_eq!(reference.youtube_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn draft_requires_http_url() {
        let draft = ReferenceDraft {
            title: "Vibe".into(),
            url: "spotify:track:123".into(),
            ..ReferenceDraft::default()
        };
        assert!(draft.validate().is_err());
    }
}
