//! Release entity model and DTOs.

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::json_field::parse_json_field;
use labelops_core::search::Searchable;
use labelops_core::status::validate_release_status;
use labelops_core::types::{Date, DbId, Timestamp};
use labelops_core::validation::{
    require_non_empty, require_non_empty_if_present, validate_http_url,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw row from the `releases` table. `platforms` is JSON text.
#[derive(Debug, Clone, FromRow)]
pub struct ReleaseRow {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub release_date: Option<Date>,
    pub status: String,
    pub distributor: Option<String>,
    pub upc: Option<String>,
    pub platforms: Option<String>,
    pub cover_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub release_date: Option<Date>,
    pub status: String,
    pub distributor: Option<String>,
    pub upc: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub cover_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ReleaseRow> for Release {
    fn from(row: ReleaseRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            release_date: row.release_date,
            status: row.status,
            distributor: row.distributor,
            upc: row.upc,
            platforms: parse_json_field(row.platforms.as_deref()),
            cover_url: row.cover_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Searchable for Release {
    fn search_fields(&self) -> Vec<Option<&str>> {
        let mut fields = vec![
            Some(self.title.as_str()),
            self.distributor.as_deref(),
            self.upc.as_deref(),
        ];
        fields.extend(self.platforms.iter().map(|p| Some(p.as_str())));
        fields
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRelease {
    pub project_id: DbId,
    pub title: String,
    pub release_date: Option<Date>,
    /// Defaults to `scheduled` if omitted.
    pub status: Option<String>,
    pub distributor: Option<String>,
    pub upc: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub cover_url: Option<String>,
}

impl CreateRelease {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("title", &self.title)?;
        validate_shape(self.status.as_deref(), self.cover_url.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRelease {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub release_date: Option<Option<Date>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub distributor: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub upc: Option<Option<String>>,
    pub platforms: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub cover_url: Option<Option<String>>,
}

impl UpdateRelease {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("title", self.title.as_deref())?;
        validate_shape(self.status.as_deref(), nullable::value_str(&self.cover_url))
    }
}

fn validate_shape(status: Option<&str>, cover_url: Option<&str>) -> Result<(), CoreError> {
    if let Some(status) = status {
        validate_release_status(status)?;
    }
    if let Some(url) = cover_url.filter(|u| !u.trim().is_empty()) {
        validate_http_url("cover_url", url)?;
    }
    Ok(())
}
