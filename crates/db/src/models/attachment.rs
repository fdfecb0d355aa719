//! File attachment model.
//!
//! Attachments hang off a project, payment, budget or release through
//! (`owner_type`, `owner_id`); there is no foreign key, so the api checks the
//! owner exists before uploading.

use labelops_core::search::Searchable;
use labelops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Attachment {
    pub id: DbId,
    pub owner_type: String,
    pub owner_id: DbId,
    pub file_name: String,
    pub storage_key: String,
    pub public_url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub created_at: Timestamp,
}

impl Searchable for Attachment {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.file_name.as_str()), Some(self.mime_type.as_str())]
    }
}

#[derive(Debug, Clone)]
pub struct CreateAttachment {
    pub owner_type: String,
    pub owner_id: DbId,
    pub file_name: String,
    pub storage_key: String,
    pub public_url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}
