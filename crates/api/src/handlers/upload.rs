//! Multipart parsing and object-store plumbing shared by the document and
//! attachment uploads.
//!
//! Uploads never fall back to the local mirror: the object store and the
//! database must both accept the file, and an object whose row could not be
//! inserted is removed again.

use std::collections::HashMap;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use labelops_core::storage::{content_checksum, guess_mime_type, DEFAULT_MIME_TYPE};
use labelops_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The `file` part of an upload form.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// All parts of an upload form: at most one file plus text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    file: Option<UploadedFile>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Read every part of `multipart`. Files larger than `max_bytes` are
    /// rejected with 413.
    pub async fn read(multipart: &mut Multipart, max_bytes: usize) -> AppResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or("").to_string();
            if name == "file" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .filter(|ct| !ct.is_empty() && *ct != DEFAULT_MIME_TYPE)
                    .map(str::to_string)
                    .unwrap_or_else(|| guess_mime_type(&file_name).to_string());
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > max_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File is {} bytes; the limit is {max_bytes}",
                        bytes.len()
                    )));
                }
                form.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await.map_err(multipart_error)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self) -> AppResult<UploadedFile> {
        match self.file.take() {
            Some(file) if !file.bytes.is_empty() => Ok(file),
            Some(_) => Err(AppError::BadRequest("The uploaded file is empty".into())),
            None => Err(AppError::BadRequest("Missing 'file' field".into())),
        }
    }

    /// A text field, trimmed; blank counts as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, name: &str) -> AppResult<&str> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("Missing '{name}' field")))
    }

    pub fn id(&self, name: &str) -> AppResult<Option<DbId>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<DbId>()
                    .map_err(|_| AppError::BadRequest(format!("'{name}' must be an integer id")))
            })
            .transpose()
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

/// What the store holds after a successful put.
#[derive(Debug)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub checksum_sha256: String,
}

pub async fn put_object(state: &AppState, key: String, file: UploadedFile) -> AppResult<StoredObject> {
    let size_bytes = file.bytes.len() as i64;
    let checksum_sha256 = content_checksum(&file.bytes);
    state
        .store
        .put(&key, file.bytes, &file.content_type)
        .await?;
    tracing::info!(key = %key, size_bytes, "Stored object");
    Ok(StoredObject {
        public_url: state.store.public_url(&key),
        key,
        mime_type: file.content_type,
        size_bytes,
        checksum_sha256,
    })
}

/// Remove an object whose row is gone or was never written. Failures leave
/// an orphaned object behind and are only logged.
pub async fn discard_object(state: &AppState, key: &str) {
    if let Err(err) = state.store.delete(key).await {
        tracing::warn!(key, error = %err, "Failed to remove stored object");
    }
}
