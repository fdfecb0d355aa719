//! Artist entity model and DTOs.

use std::collections::BTreeMap;

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::json_field::parse_json_field;
use labelops_core::search::Searchable;
use labelops_core::status::validate_artist_status;
use labelops_core::types::{DbId, Timestamp};
use labelops_core::validation::{
    require_non_empty, require_non_empty_if_present, validate_email, validate_http_url,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw row from the `artists` table. `social_links` is JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct ArtistRow {
    pub id: DbId,
    pub name: String,
    pub stage_name: Option<String>,
    pub genre: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub social_links: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An artist on the label's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: DbId,
    pub name: String,
    pub stage_name: Option<String>,
    pub genre: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    /// Network name to handle or URL, e.g. `"instagram" -> "@artista"`.
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ArtistRow> for Artist {
    fn from(row: ArtistRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            stage_name: row.stage_name,
            genre: row.genre,
            email: row.email,
            phone: row.phone,
            bio: row.bio,
            photo_url: row.photo_url,
            social_links: parse_json_field(row.social_links.as_deref()),
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Searchable for Artist {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.stage_name.as_deref(),
            self.genre.as_deref(),
            self.email.as_deref(),
        ]
    }
}

/// DTO for creating a new artist.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArtist {
    pub name: String,
    pub stage_name: Option<String>,
    pub genre: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub social_links: Option<BTreeMap<String, String>>,
    /// Defaults to `active` if omitted.
    pub status: Option<String>,
}

impl CreateArtist {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)?;
        validate_contact(self.email.as_deref(), self.photo_url.as_deref())?;
        if let Some(status) = &self.status {
            validate_artist_status(status)?;
        }
        Ok(())
    }
}

/// DTO for updating an existing artist. All fields are optional;
/// `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateArtist {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub stage_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub genre: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub photo_url: Option<Option<String>>,
    pub social_links: Option<BTreeMap<String, String>>,
    pub status: Option<String>,
}

impl UpdateArtist {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("name", self.name.as_deref())?;
        validate_contact(
            nullable::value_str(&self.email),
            nullable::value_str(&self.photo_url),
        )?;
        if let Some(status) = &self.status {
            validate_artist_status(status)?;
        }
        Ok(())
    }
}

fn validate_contact(email: Option<&str>, photo_url: Option<&str>) -> Result<(), CoreError> {
    if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
        validate_email("email", email)?;
    }
    if let Some(url) = photo_url.filter(|u| !u.trim().is_empty()) {
        validate_http_url("photo_url", url)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(social_links: Option<&str>) -> ArtistRow {
        ArtistRow {
            id: 1,
            name: "Marina".into(),
            stage_name: None,
            genre: Some("Pop".into()),
            email: None,
            phone: None,
            bio: None,
            photo_url: None,
            social_links: social_links.map(str::to_string),
            status: "active".into(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn social_links_parse_leniently() {
        let artist = Artist::from(row(Some(r#"{"instagram":"@marina"}"#)));
        assert_eq!(artist.social_links["instagram"], "@marina");

        let artist = Artist::from(row(Some("not json")));
        assert!(artist.social_links.is_empty());
    }

    #[test]
    fn create_requires_name_and_valid_status() {
        let mut input = CreateArtist {
            name: " ".into(),
            stage_name: None,
            genre: None,
            email: None,
            phone: None,
            bio: None,
            photo_url: None,
            social_links: None,
            status: None,
        };
        assert!(input.validate().is_err());
        input.name = "Liniker".into();
        assert!(input.validate().is_ok());
        input.status = Some("retired".into());
        assert!(input.validate().is_err());
        input.status = None;
        input.email = Some("not-an-email".into());
        assert!(input.validate().is_err());
        input.email = Some(String::new());
        assert!(input.validate().is_ok());
    }
}
