//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Inserts that also run inside
//! the composite project transaction accept any `PgExecutor` instead.
//!
//! Lists return whole tables: the dashboard filters in memory and the local
//! mirror keeps a full copy of each table.

pub mod artist_repo;
pub mod attachment_repo;
pub mod budget_repo;
pub mod document_repo;
pub mod payment_repo;
pub mod producer_repo;
pub mod project_repo;
pub mod reference_repo;
pub mod release_repo;
pub mod supplier_repo;
pub mod track_repo;

pub use artist_repo::ArtistRepo;
pub use attachment_repo::{AttachmentRepo, AttachmentScope};
pub use budget_repo::BudgetRepo;
pub use document_repo::DocumentRepo;
pub use payment_repo::PaymentRepo;
pub use producer_repo::ProducerRepo;
pub use project_repo::ProjectRepo;
pub use reference_repo::ReferenceRepo;
pub use release_repo::ReleaseRepo;
pub use supplier_repo::SupplierRepo;
pub use track_repo::TrackRepo;

/// Delete one row by id from `table`. Returns `true` if a row was removed.
pub(crate) async fn delete_by_id(
    pool: &sqlx::PgPool,
    table: &str,
    id: labelops_core::types::DbId,
) -> Result<bool, sqlx::Error> {
    let query = format!("DELETE FROM {table} WHERE id = $1");
    let result = sqlx::query(&query).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Delete one row by id from `table` together with the attachments in
/// `scope`, in one transaction.
///
/// Returns `None` when no row matched, otherwise the storage keys of the
/// removed attachments.
pub(crate) async fn delete_with_attachments(
    pool: &sqlx::PgPool,
    table: &str,
    scope: AttachmentScope,
    id: labelops_core::types::DbId,
) -> Result<Option<Vec<String>>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let keys = AttachmentRepo::delete_in_scope(&mut *tx, scope, id).await?;

    let query = format!("DELETE FROM {table} WHERE id = $1");
    let result = sqlx::query(&query).bind(id).execute(&mut *tx).await?;
    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }
    tx.commit().await?;
    Ok(Some(keys))
}
