//! Handlers for the `/attachments` resource: files hanging off a project,
//! payment, budget line or release.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::error::CoreError;
use labelops_core::status::{
    validate_attachment_owner_type, ATTACHMENT_OWNER_BUDGET, ATTACHMENT_OWNER_PAYMENT,
    ATTACHMENT_OWNER_PROJECT, ATTACHMENT_OWNER_RELEASE,
};
use labelops_core::storage::attachment_key;
use labelops_core::types::DbId;
use labelops_db::models::attachment::{Attachment, CreateAttachment};
use labelops_db::repositories::{
    AttachmentRepo, BudgetRepo, PaymentRepo, ProjectRepo, ReleaseRepo,
};
use labelops_db::DbPool;

use crate::data_access;
use crate::error::{AppError, AppResult};
use crate::handlers::upload::{self, UploadForm};
use crate::query::AttachmentListParams;
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Attachment",
        id,
    })
}

fn owner_label(owner_type: &str) -> &'static str {
    match owner_type {
        ATTACHMENT_OWNER_PROJECT => "Project",
        ATTACHMENT_OWNER_PAYMENT => "Payment",
        ATTACHMENT_OWNER_BUDGET => "Budget",
        _ => "Release",
    }
}

/// Owners have no foreign key, so the row is looked up before the upload.
/// `owner_type` must already be validated.
async fn owner_exists(pool: &DbPool, owner_type: &str, owner_id: DbId) -> AppResult<bool> {
    let exists = match owner_type {
        ATTACHMENT_OWNER_PROJECT => ProjectRepo::find_by_id(pool, owner_id).await?.is_some(),
        ATTACHMENT_OWNER_PAYMENT => PaymentRepo::find_by_id(pool, owner_id).await?.is_some(),
        ATTACHMENT_OWNER_BUDGET => BudgetRepo::find_by_id(pool, owner_id).await?.is_some(),
        ATTACHMENT_OWNER_RELEASE => ReleaseRepo::find_by_id(pool, owner_id).await?.is_some(),
        _ => false,
    };
    Ok(exists)
}

/// POST /api/v1/attachments (multipart)
///
/// Parts: `file`, `owner_type`, `owner_id`.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Written<Attachment>>)> {
    let mut form = UploadForm::read(&mut multipart, state.config.max_upload_bytes).await?;
    let file = form.take_file()?;
    let owner_type = form.required("owner_type")?.to_string();
    validate_attachment_owner_type(&owner_type)?;
    let owner_id = form
        .id("owner_id")?
        .ok_or_else(|| AppError::BadRequest("Missing 'owner_id' field".into()))?;

    if !owner_exists(&state.pool, &owner_type, owner_id).await? {
        return Err(AppError::Core(CoreError::InvalidReference {
            entity: owner_label(&owner_type),
            id: owner_id,
        }));
    }

    let file_name = file.file_name.clone();
    let key = attachment_key(&owner_type, owner_id, &file_name);
    let stored = upload::put_object(&state, key, file).await?;

    let input = CreateAttachment {
        owner_type,
        owner_id,
        file_name,
        storage_key: stored.key.clone(),
        public_url: stored.public_url,
        mime_type: stored.mime_type,
        size_bytes: stored.size_bytes,
    };
    let attachment = match AttachmentRepo::create(&state.pool, &input).await {
        Ok(attachment) => attachment,
        Err(err) => {
            upload::discard_object(&state, &stored.key).await;
            return Err(err.into());
        }
    };
    state.mirror.store(attachment.clone()).await;
    Ok(Written::persisted(attachment).with_status(StatusCode::CREATED))
}

/// GET /api/v1/attachments?owner_type=&owner_id=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AttachmentListParams>,
) -> AppResult<Json<Loaded<Vec<Attachment>>>> {
    validate_attachment_owner_type(&params.owner_type)?;
    let owner_type = params.owner_type.as_str();
    let owner_id = params.owner_id;
    let loaded = data_access::load_matching(
        &state,
        |a: &Attachment| a.owner_type == owner_type && a.owner_id == owner_id,
        AttachmentRepo::list_by_owner(&state.pool, owner_type, owner_id),
    )
    .await?;
    Ok(Json(loaded))
}

/// DELETE /api/v1/attachments/{id}
///
/// Removes the row, then the stored file.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    let attachment = AttachmentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    if !AttachmentRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    state.mirror.delete::<Attachment>(id).await;
    upload::discard_object(&state, &attachment.storage_key).await;
    Ok(Deleted::Persisted)
}
