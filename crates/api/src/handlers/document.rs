//! Handlers for the `/documents` resource: standalone files such as
//! contracts and invoices, optionally linked to an artist or project.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::error::CoreError;
use labelops_core::search::filter_rows;
use labelops_core::storage::document_key;
use labelops_core::types::DbId;
use labelops_db::models::document::{CreateDocument, Document, UpdateDocument};
use labelops_db::repositories::DocumentRepo;

use crate::data_access;
use crate::error::{AppError, AppResult};
use crate::handlers::upload::{self, UploadForm};
use crate::query::{matches, matches_opt, DocumentListParams};
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Document",
        id,
    })
}

/// POST /api/v1/documents (multipart)
///
/// Parts: `file`, `category`, and optionally `name` (defaults to the file
/// name), `artist_id`, `project_id`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Written<Document>>)> {
    let mut form = UploadForm::read(&mut multipart, state.config.max_upload_bytes).await?;
    let file = form.take_file()?;

    let mut input = CreateDocument {
        name: form
            .text("name")
            .map(str::to_string)
            .unwrap_or_else(|| file.file_name.clone()),
        category: form.required("category")?.to_string(),
        artist_id: form.id("artist_id")?,
        project_id: form.id("project_id")?,
        storage_key: String::new(),
        public_url: String::new(),
        mime_type: String::new(),
        size_bytes: 0,
        checksum_sha256: String::new(),
    };
    input.validate()?;

    let stored = upload::put_object(&state, document_key(&file.file_name), file).await?;
    input.storage_key = stored.key.clone();
    input.public_url = stored.public_url;
    input.mime_type = stored.mime_type;
    input.size_bytes = stored.size_bytes;
    input.checksum_sha256 = stored.checksum_sha256;

    let document = match DocumentRepo::create(&state.pool, &input).await {
        Ok(document) => document,
        Err(err) => {
            upload::discard_object(&state, &stored.key).await;
            return Err(err.into());
        }
    };
    state.mirror.store(document.clone()).await;
    Ok(Written::persisted(document).with_status(StatusCode::CREATED))
}

/// GET /api/v1/documents?q=&category=&artist_id=&project_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<DocumentListParams>,
) -> AppResult<Json<Loaded<Vec<Document>>>> {
    let loaded = data_access::load_all(&state, DocumentRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|documents| {
        let documents = documents
            .into_iter()
            .filter(|d| matches(params.category.as_deref(), d.category.as_str()))
            .filter(|d| matches_opt(params.artist_id, d.artist_id))
            .filter(|d| matches_opt(params.project_id, d.project_id))
            .collect();
        filter_rows(documents, params.q.as_deref())
    })))
}

/// GET /api/v1/documents/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Document>>> {
    let loaded =
        data_access::load_one(&state, id, DocumentRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// PUT /api/v1/documents/{id}
///
/// Metadata only; the stored file never changes. Not applied locally when
/// the database is down.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDocument>,
) -> AppResult<Json<Written<Document>>> {
    input.validate()?;
    let document = DocumentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    state.mirror.store(document.clone()).await;
    Ok(Json(Written::persisted(document)))
}

/// DELETE /api/v1/documents/{id}
///
/// Removes the row, then the stored file.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    let document = DocumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !DocumentRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    state.mirror.delete::<Document>(id).await;
    upload::discard_object(&state, &document.storage_key).await;
    Ok(Deleted::Persisted)
}
