//! One mirrored table: the rows plus the counter for local-only ids.

use std::sync::atomic::{AtomicI64, Ordering};

use labelops_core::types::DbId;
use tokio::sync::RwLock;

use super::MirrorRecord;

/// The last known contents of one table.
///
/// Thread-safe via interior `RwLock`; shared through the owning
/// [`LocalMirror`](super::LocalMirror).
#[derive(Debug)]
pub struct MirrorTable<T> {
    rows: RwLock<Vec<T>>,
    last_local_id: AtomicI64,
}

impl<T: MirrorRecord> MirrorTable<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows: RwLock::new(rows),
            last_local_id: AtomicI64::new(0),
        }
    }

    /// Hand out the next local-only id: -1, -2, ...
    pub fn next_local_id(&self) -> DbId {
        self.last_local_id.fetch_sub(1, Ordering::Relaxed) - 1
    }

    /// Clone every row.
    pub async fn snapshot(&self) -> Vec<T> {
        self.rows.read().await.clone()
    }

    /// Clone the rows matching `pred`.
    pub async fn filtered(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|row| pred(row))
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: DbId) -> Option<T> {
        self.rows.read().await.iter().find(|r| r.id() == id).cloned()
    }

    pub async fn contains(&self, id: DbId) -> bool {
        self.rows.read().await.iter().any(|r| r.id() == id)
    }

    /// Insert `row`, replacing any row with the same id.
    pub async fn store(&self, row: T) {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.id() == row.id()) {
            Some(existing) => *existing = row,
            None => rows.push(row),
        }
    }

    /// Remove the row with `id`, returning it.
    pub async fn remove(&self, id: DbId) -> Option<T> {
        let mut rows = self.rows.write().await;
        let pos = rows.iter().position(|r| r.id() == id)?;
        Some(rows.remove(pos))
    }

    /// Remove every row matching `pred`, returning the removed rows.
    pub async fn remove_where(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        let mut rows = self.rows.write().await;
        let (removed, kept): (Vec<T>, Vec<T>) = rows.drain(..).partition(|r| pred(r));
        *rows = kept;
        removed
    }

    /// Apply `change` to every row matching `pred`. Returns how many rows
    /// were touched.
    pub async fn update_where(
        &self,
        pred: impl Fn(&T) -> bool,
        mut change: impl FnMut(&mut T),
    ) -> usize {
        let mut rows = self.rows.write().await;
        let mut touched = 0;
        for row in rows.iter_mut().filter(|r| pred(r)) {
            change(row);
            touched += 1;
        }
        touched
    }

    /// Run `f` with exclusive access to the rows.
    pub async fn with_rows_mut<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut rows = self.rows.write().await;
        f(&mut rows)
    }

    /// Replace the whole table with freshly fetched rows.
    ///
    /// Returns how many local-only rows (negative ids) were dropped.
    pub async fn replace_all(&self, fresh: Vec<T>) -> usize {
        let mut rows = self.rows.write().await;
        let discarded = rows.iter().filter(|r| r.id() < 0).count();
        *rows = fresh;
        discarded
    }

    /// Replace the rows matching `pred` with `fresh`, leaving other rows
    /// alone. Used when the remote read only covered part of the table.
    pub async fn replace_matching(&self, pred: impl Fn(&T) -> bool, fresh: Vec<T>) -> usize {
        let mut rows = self.rows.write().await;
        let discarded = rows.iter().filter(|r| pred(r) && r.id() < 0).count();
        rows.retain(|r| !pred(r));
        rows.extend(fresh);
        discarded
    }
}
