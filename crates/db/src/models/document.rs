//! Stored document model.
//!
//! Documents are created only through the upload endpoint, which writes the
//! object first and then the row.

use labelops_core::error::CoreError;
use labelops_core::search::Searchable;
use labelops_core::status::validate_document_category;
use labelops_core::types::{DbId, Timestamp};
use labelops_core::validation::{require_non_empty, require_non_empty_if_present};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Document {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub artist_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub storage_key: String,
    pub public_url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub checksum_sha256: String,
    pub created_at: Timestamp,
}

impl Searchable for Document {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            Some(self.category.as_str()),
            Some(self.mime_type.as_str()),
        ]
    }
}

/// Everything needed to insert a document row after the upload succeeded.
#[derive(Debug, Clone)]
pub struct CreateDocument {
    pub name: String,
    pub category: String,
    pub artist_id: Option<DbId>,
    pub project_id: Option<DbId>,
    pub storage_key: String,
    pub public_url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub checksum_sha256: String,
}

impl CreateDocument {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)?;
        validate_document_category(&self.category)
    }
}

/// DTO for renaming or re-filing a document. The stored object is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDocument {
    pub name: Option<String>,
    pub category: Option<String>,
    pub artist_id: Option<DbId>,
    pub project_id: Option<DbId>,
}

impl UpdateDocument {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("name", self.name.as_deref())?;
        if let Some(category) = &self.category {
            validate_document_category(category)?;
        }
        Ok(())
    }
}
