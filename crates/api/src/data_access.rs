//! Optimistic data access with a local fallback.
//!
//! Every handler hands its repository call to one of these helpers as an
//! unpolled future. The helper awaits it and, only when the database could
//! not be reached ([`labelops_db::is_unavailable`]), answers from or writes
//! to the [`LocalMirror`](labelops_db::mirror::LocalMirror) instead.
//! Successful remote answers are copied into the mirror so it always holds
//! the last known state.
//!
//! Local fallback futures are also passed unpolled; they only run when the
//! remote call failed for availability.

use std::future::Future;

use labelops_core::error::CoreError;
use labelops_core::types::DbId;
use labelops_db::is_unavailable;
use labelops_db::mirror::{EntityKind, LocalWrite, MirrorRecord};

use crate::config::FallbackMode;
use crate::error::{AppError, AppResult};
use crate::handlers::upload;
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

fn not_found<T: MirrorRecord>(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: T::KIND.name(),
        id,
    })
}

fn log_fallback(kind: EntityKind, operation: &'static str, err: &sqlx::Error) {
    tracing::warn!(
        entity = kind.name(),
        operation,
        error = %err,
        "Database unavailable, falling back to local mirror"
    );
}

/// Refuse a local write when the server runs in strict mode.
pub fn ensure_local_writes(
    state: &AppState,
    kind: EntityKind,
    operation: &'static str,
    err: &sqlx::Error,
) -> AppResult<()> {
    log_fallback(kind, operation, err);
    match state.config.fallback_mode {
        FallbackMode::Local => Ok(()),
        FallbackMode::Strict => Err(AppError::PersistenceUnavailable(format!(
            "{} {operation} was not persisted: the database is unavailable",
            kind.name()
        ))),
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Load a whole table. A remote answer replaces the mirror table.
pub async fn load_all<T, R>(state: &AppState, remote: R) -> AppResult<Loaded<Vec<T>>>
where
    T: MirrorRecord,
    R: Future<Output = Result<Vec<T>, sqlx::Error>>,
{
    match remote.await {
        Ok(rows) => {
            state.mirror.replace(rows.clone()).await;
            Ok(Loaded::remote(rows))
        }
        Err(err) if is_unavailable(&err) => {
            log_fallback(T::KIND, "list", &err);
            Ok(Loaded::fallback(state.mirror.list::<T>().await))
        }
        Err(err) => Err(err.into()),
    }
}

/// Load the rows matching `pred`, for reads that only cover part of a table.
pub async fn load_matching<T, R, P>(
    state: &AppState,
    pred: P,
    remote: R,
) -> AppResult<Loaded<Vec<T>>>
where
    T: MirrorRecord,
    R: Future<Output = Result<Vec<T>, sqlx::Error>>,
    P: Fn(&T) -> bool,
{
    match remote.await {
        Ok(rows) => {
            state.mirror.replace_matching(&pred, rows.clone()).await;
            Ok(Loaded::remote(rows))
        }
        Err(err) if is_unavailable(&err) => {
            log_fallback(T::KIND, "list", &err);
            Ok(Loaded::fallback(
                state.mirror.table::<T>().filtered(&pred).await,
            ))
        }
        Err(err) => Err(err.into()),
    }
}

/// Load one row by id.
pub async fn load_one<T, R>(state: &AppState, id: DbId, remote: R) -> AppResult<Loaded<T>>
where
    T: MirrorRecord,
    R: Future<Output = Result<Option<T>, sqlx::Error>>,
{
    match remote.await {
        Ok(Some(row)) => {
            state.mirror.store(row.clone()).await;
            Ok(Loaded::remote(row))
        }
        Ok(None) => Err(not_found::<T>(id)),
        Err(err) if is_unavailable(&err) => {
            log_fallback(T::KIND, "get", &err);
            Ok(Loaded::fallback(state.mirror.find::<T>(id).await?))
        }
        Err(err) => Err(err.into()),
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Run `remote`; on an availability failure run `local` instead, unless the
/// server is in strict mode. The caller syncs the mirror after a persisted
/// write.
pub async fn write_or_fallback<T, R, L>(
    state: &AppState,
    kind: EntityKind,
    operation: &'static str,
    remote: R,
    local: L,
) -> AppResult<Written<T>>
where
    R: Future<Output = Result<T, sqlx::Error>>,
    L: Future<Output = Result<T, CoreError>>,
{
    match remote.await {
        Ok(value) => Ok(Written::persisted(value)),
        Err(err) if is_unavailable(&err) => {
            ensure_local_writes(state, kind, operation, &err)?;
            Ok(Written::local(local.await?))
        }
        Err(err) => Err(err.into()),
    }
}

/// Insert a row, or create it in the mirror with a negative id.
pub async fn create<T, R>(state: &AppState, input: &T::Create, remote: R) -> AppResult<Written<T>>
where
    T: LocalWrite,
    R: Future<Output = Result<T, sqlx::Error>>,
{
    let written = write_or_fallback(
        state,
        T::KIND,
        "create",
        remote,
        state.mirror.create::<T>(input),
    )
    .await?;
    if written.persisted {
        state.mirror.store(written.data.clone()).await;
    }
    Ok(written)
}

/// Apply a partial update remotely, or to the mirror copy of the row.
pub async fn update<T, R>(
    state: &AppState,
    id: DbId,
    input: &T::Update,
    remote: R,
) -> AppResult<Written<T>>
where
    T: LocalWrite,
    R: Future<Output = Result<Option<T>, sqlx::Error>>,
{
    match remote.await {
        Ok(Some(row)) => {
            state.mirror.store(row.clone()).await;
            Ok(Written::persisted(row))
        }
        Ok(None) => Err(not_found::<T>(id)),
        Err(err) if is_unavailable(&err) => {
            ensure_local_writes(state, T::KIND, "update", &err)?;
            Ok(Written::local(state.mirror.update::<T>(id, input).await?))
        }
        Err(err) => Err(err.into()),
    }
}

/// What a repository delete reports.
pub trait RemoteDelete {
    /// `None` when no row matched, otherwise the storage keys of the
    /// attachments removed with the row.
    fn released_keys(self) -> Option<Vec<String>>;
}

impl RemoteDelete for bool {
    fn released_keys(self) -> Option<Vec<String>> {
        self.then(Vec::new)
    }
}

impl RemoteDelete for Option<Vec<String>> {
    fn released_keys(self) -> Option<Vec<String>> {
        self
    }
}

/// Delete a row. The mirror cascades the delete the same way the schema
/// does, whether or not the database was reached.
///
/// Stored objects of attachments the database removed with the row are
/// discarded. A local delete keeps them: the database rows still point at
/// them until the next refresh.
pub async fn delete<T, R, O>(state: &AppState, id: DbId, remote: R) -> AppResult<Deleted>
where
    T: MirrorRecord,
    R: Future<Output = Result<O, sqlx::Error>>,
    O: RemoteDelete,
{
    match remote.await.map(RemoteDelete::released_keys) {
        Ok(Some(keys)) => {
            state.mirror.delete::<T>(id).await;
            if !keys.is_empty() {
                tracing::info!(
                    entity = T::KIND.name(),
                    id,
                    attachments = keys.len(),
                    "Removing attachments of deleted row"
                );
            }
            for key in &keys {
                upload::discard_object(state, key).await;
            }
            Ok(Deleted::Persisted)
        }
        Ok(None) => Err(not_found::<T>(id)),
        Err(err) if is_unavailable(&err) => {
            ensure_local_writes(state, T::KIND, "delete", &err)?;
            if state.mirror.delete::<T>(id).await {
                Ok(Deleted::Local)
            } else {
                Err(not_found::<T>(id))
            }
        }
        Err(err) => Err(err.into()),
    }
}
