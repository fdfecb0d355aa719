//! The local mirror: the last known copy of every table, kept in memory.
//!
//! The mirror starts from a mock dataset (embedded, or loaded from a file)
//! and is overwritten by every successful remote read. When the database
//! cannot be reached, reads are answered from it and writes are applied to
//! it instead, so the dashboard keeps reflecting what the user did.
//!
//! Rows created locally get negative ids and are dropped the next time the
//! table is refreshed from the database.

mod records;
mod table;

use std::path::Path;

use chrono::Utc;
use labelops_core::error::CoreError;
use labelops_core::status::{
    ATTACHMENT_OWNER_BUDGET, ATTACHMENT_OWNER_PAYMENT, ATTACHMENT_OWNER_PROJECT,
    ATTACHMENT_OWNER_RELEASE,
};
use labelops_core::types::{DbId, Timestamp};
use serde::Deserialize;

use crate::models::artist::Artist;
use crate::models::attachment::Attachment;
use crate::models::budget::{Budget, CreateBudget};
use crate::models::document::Document;
use crate::models::payment::Payment;
use crate::models::producer::Producer;
use crate::models::project::{CreateProjectComposite, Project};
use crate::models::reference::Reference;
use crate::models::release::Release;
use crate::models::supplier::Supplier;
use crate::models::track::Track;

pub use table::MirrorTable;

/// Dataset compiled into the binary, used when no file is configured.
const EMBEDDED_DATASET: &str = include_str!("../../seed/mock_dataset.json");

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("Failed to read dataset {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

/// The mirrored tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Artist,
    Project,
    Track,
    Reference,
    Budget,
    Payment,
    Supplier,
    Producer,
    Release,
    Document,
    Attachment,
}

impl EntityKind {
    /// Singular name used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Artist => "Artist",
            Self::Project => "Project",
            Self::Track => "Track",
            Self::Reference => "Reference",
            Self::Budget => "Budget",
            Self::Payment => "Payment",
            Self::Supplier => "Supplier",
            Self::Producer => "Producer",
            Self::Release => "Release",
            Self::Document => "Document",
            Self::Attachment => "Attachment",
        }
    }
}

fn ids<T: MirrorRecord>(rows: &[T]) -> Vec<DbId> {
    rows.iter().map(MirrorRecord::id).collect()
}

// ---------------------------------------------------------------------------
// Record traits
// ---------------------------------------------------------------------------

/// A row type held in the mirror.
pub trait MirrorRecord: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> DbId;

    /// The mirror table holding rows of this type.
    fn table(mirror: &LocalMirror) -> &MirrorTable<Self>;

    /// Recompute derived fields after the row changed.
    fn refresh(&mut self) {}
}

/// A row type that can be created and updated locally while the database
/// is unavailable.
pub trait LocalWrite: MirrorRecord {
    type Create: Sync;
    type Update: Sync;

    fn from_create(id: DbId, input: &Self::Create, now: Timestamp) -> Self;

    /// Apply the present fields of `input` like the repository's update,
    /// clearing nullable fields sent as `null`.
    fn apply_update(&mut self, input: &Self::Update, now: Timestamp);

    /// Rows a create input points at, which must exist.
    fn create_parents(input: &Self::Create) -> Vec<(EntityKind, DbId)>;

    /// Rows an update input points at, which must exist.
    fn update_parents(_input: &Self::Update) -> Vec<(EntityKind, DbId)> {
        Vec::new()
    }

    /// Key that must be unique across the table, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// The JSON shape of a mock dataset. Missing tables are empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MockDataset {
    pub artists: Vec<Artist>,
    pub projects: Vec<Project>,
    pub tracks: Vec<Track>,
    pub references: Vec<Reference>,
    pub budgets: Vec<Budget>,
    pub payments: Vec<Payment>,
    pub suppliers: Vec<Supplier>,
    pub producers: Vec<Producer>,
    pub releases: Vec<Release>,
    pub documents: Vec<Document>,
    pub attachments: Vec<Attachment>,
}

impl MockDataset {
    pub fn from_json(json: &str) -> Result<Self, MirrorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn embedded() -> Result<Self, MirrorError> {
        Self::from_json(EMBEDDED_DATASET)
    }

    pub fn from_path(path: &Path) -> Result<Self, MirrorError> {
        let json = std::fs::read_to_string(path).map_err(|source| MirrorError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

fn refreshed<T: MirrorRecord>(mut rows: Vec<T>) -> Vec<T> {
    rows.iter_mut().for_each(T::refresh);
    rows
}

// ---------------------------------------------------------------------------
// Mirror
// ---------------------------------------------------------------------------

/// In-memory copy of every table, one lock per table.
#[derive(Debug)]
pub struct LocalMirror {
    artists: MirrorTable<Artist>,
    projects: MirrorTable<Project>,
    tracks: MirrorTable<Track>,
    references: MirrorTable<Reference>,
    budgets: MirrorTable<Budget>,
    payments: MirrorTable<Payment>,
    suppliers: MirrorTable<Supplier>,
    producers: MirrorTable<Producer>,
    releases: MirrorTable<Release>,
    documents: MirrorTable<Document>,
    attachments: MirrorTable<Attachment>,
}

impl LocalMirror {
    pub fn new(dataset: MockDataset) -> Self {
        Self {
            artists: MirrorTable::new(dataset.artists),
            projects: MirrorTable::new(dataset.projects),
            tracks: MirrorTable::new(refreshed(dataset.tracks)),
            references: MirrorTable::new(refreshed(dataset.references)),
            budgets: MirrorTable::new(dataset.budgets),
            payments: MirrorTable::new(dataset.payments),
            suppliers: MirrorTable::new(dataset.suppliers),
            producers: MirrorTable::new(dataset.producers),
            releases: MirrorTable::new(dataset.releases),
            documents: MirrorTable::new(dataset.documents),
            attachments: MirrorTable::new(dataset.attachments),
        }
    }

    /// A mirror with no rows at all.
    pub fn empty() -> Self {
        Self::new(MockDataset::default())
    }

    /// Seed from `path` when given, otherwise from the embedded dataset.
    pub fn load(path: Option<&Path>) -> Result<Self, MirrorError> {
        let dataset = match path {
            Some(path) => MockDataset::from_path(path)?,
            None => MockDataset::embedded()?,
        };
        Ok(Self::new(dataset))
    }

    pub fn table<T: MirrorRecord>(&self) -> &MirrorTable<T> {
        T::table(self)
    }

    // -- reads ---------------------------------------------------------------

    pub async fn list<T: MirrorRecord>(&self) -> Vec<T> {
        self.table::<T>().snapshot().await
    }

    pub async fn get<T: MirrorRecord>(&self, id: DbId) -> Option<T> {
        self.table::<T>().get(id).await
    }

    /// Like [`get`](Self::get) but a missing row is `CoreError::NotFound`.
    pub async fn find<T: MirrorRecord>(&self, id: DbId) -> Result<T, CoreError> {
        self.get(id).await.ok_or(CoreError::NotFound {
            entity: T::KIND.name(),
            id,
        })
    }

    pub async fn contains(&self, kind: EntityKind, id: DbId) -> bool {
        match kind {
            EntityKind::Artist => self.artists.contains(id).await,
            EntityKind::Project => self.projects.contains(id).await,
            EntityKind::Track => self.tracks.contains(id).await,
            EntityKind::Reference => self.references.contains(id).await,
            EntityKind::Budget => self.budgets.contains(id).await,
            EntityKind::Payment => self.payments.contains(id).await,
            EntityKind::Supplier => self.suppliers.contains(id).await,
            EntityKind::Producer => self.producers.contains(id).await,
            EntityKind::Release => self.releases.contains(id).await,
            EntityKind::Document => self.documents.contains(id).await,
            EntityKind::Attachment => self.attachments.contains(id).await,
        }
    }

    // -- syncing with remote results -----------------------------------------

    /// Overwrite a table with a full remote read.
    pub async fn replace<T: MirrorRecord>(&self, rows: Vec<T>) {
        let discarded = self.table::<T>().replace_all(rows).await;
        if discarded > 0 {
            tracing::warn!(
                entity = T::KIND.name(),
                discarded,
                "Dropped unsynced local rows after refreshing from the database"
            );
        }
    }

    /// Overwrite the part of a table a filtered remote read covered.
    pub async fn replace_matching<T: MirrorRecord>(
        &self,
        pred: impl Fn(&T) -> bool,
        rows: Vec<T>,
    ) {
        let discarded = self.table::<T>().replace_matching(pred, rows).await;
        if discarded > 0 {
            tracing::warn!(
                entity = T::KIND.name(),
                discarded,
                "Dropped unsynced local rows after refreshing from the database"
            );
        }
    }

    /// Record a row the database returned.
    pub async fn store<T: MirrorRecord>(&self, row: T) {
        self.table::<T>().store(row).await;
    }

    // -- local writes --------------------------------------------------------

    async fn check_parents(&self, parents: Vec<(EntityKind, DbId)>) -> Result<(), CoreError> {
        for (kind, id) in parents {
            if !self.contains(kind, id).await {
                return Err(CoreError::InvalidReference {
                    entity: kind.name(),
                    id,
                });
            }
        }
        Ok(())
    }

    /// Insert `row` unless another row already holds its unique key.
    async fn store_unique<T: LocalWrite>(&self, row: T) -> Result<T, CoreError> {
        let key = row.unique_key();
        self.table::<T>()
            .with_rows_mut(|rows| {
                if let Some(key) = &key {
                    let taken = rows
                        .iter()
                        .any(|r| r.id() != row.id() && r.unique_key().as_ref() == Some(key));
                    if taken {
                        return Err(CoreError::Conflict(format!(
                            "{} '{key}' already exists",
                            T::KIND.name()
                        )));
                    }
                }
                match rows.iter_mut().find(|r| r.id() == row.id()) {
                    Some(existing) => *existing = row.clone(),
                    None => rows.push(row.clone()),
                }
                Ok(row)
            })
            .await
    }

    /// Create a row locally with the next negative id.
    pub async fn create<T: LocalWrite>(&self, input: &T::Create) -> Result<T, CoreError> {
        self.check_parents(T::create_parents(input)).await?;
        let id = self.table::<T>().next_local_id();
        let mut row = T::from_create(id, input, Utc::now());
        row.refresh();
        self.store_unique(row).await
    }

    /// Apply a partial update locally.
    pub async fn update<T: LocalWrite>(&self, id: DbId, input: &T::Update) -> Result<T, CoreError> {
        let mut row = self.find::<T>(id).await?;
        self.check_parents(T::update_parents(input)).await?;
        row.apply_update(input, Utc::now());
        row.refresh();
        self.store_unique(row).await
    }

    /// Delete a row locally, cascading like the schema's foreign keys.
    /// Returns `false` when the row was not in the mirror.
    pub async fn delete<T: MirrorRecord>(&self, id: DbId) -> bool {
        if self.table::<T>().remove(id).await.is_none() {
            return false;
        }
        self.cascade_delete(T::KIND, id).await;
        true
    }

    /// Attachments have no foreign key; each owner removal drops them here,
    /// as the repositories do in the delete transaction.
    async fn cascade_delete(&self, kind: EntityKind, id: DbId) {
        match kind {
            EntityKind::Artist => {
                let projects = self.projects.remove_where(|p| p.artist_id == id).await;
                for project in projects {
                    self.cascade_project(project.id).await;
                }
                self.documents
                    .update_where(|d| d.artist_id == Some(id), |d| d.artist_id = None)
                    .await;
            }
            EntityKind::Project => self.cascade_project(id).await,
            EntityKind::Budget => {
                self.drop_attachments(ATTACHMENT_OWNER_BUDGET, &[id]).await;
                self.payments
                    .update_where(|p| p.budget_id == Some(id), |p| p.budget_id = None)
                    .await;
            }
            EntityKind::Supplier => {
                self.payments
                    .update_where(|p| p.supplier_id == Some(id), |p| p.supplier_id = None)
                    .await;
            }
            EntityKind::Producer => {
                self.payments
                    .update_where(|p| p.producer_id == Some(id), |p| p.producer_id = None)
                    .await;
                self.projects
                    .update_where(|p| p.producer_id == Some(id), |p| p.producer_id = None)
                    .await;
            }
            EntityKind::Payment => self.drop_attachments(ATTACHMENT_OWNER_PAYMENT, &[id]).await,
            EntityKind::Release => self.drop_attachments(ATTACHMENT_OWNER_RELEASE, &[id]).await,
            EntityKind::Track
            | EntityKind::Reference
            | EntityKind::Document
            | EntityKind::Attachment => {}
        }
    }

    async fn cascade_project(&self, project_id: DbId) {
        self.tracks.remove_where(|t| t.project_id == project_id).await;
        self.references
            .remove_where(|r| r.project_id == project_id)
            .await;
        let budgets = self.budgets.remove_where(|b| b.project_id == project_id).await;
        let payments = self
            .payments
            .remove_where(|p| p.project_id == project_id)
            .await;
        let releases = self
            .releases
            .remove_where(|r| r.project_id == project_id)
            .await;
        self.documents
            .update_where(|d| d.project_id == Some(project_id), |d| d.project_id = None)
            .await;

        self.drop_attachments(ATTACHMENT_OWNER_PROJECT, &[project_id]).await;
        self.drop_attachments(ATTACHMENT_OWNER_BUDGET, &ids(&budgets)).await;
        self.drop_attachments(ATTACHMENT_OWNER_PAYMENT, &ids(&payments)).await;
        self.drop_attachments(ATTACHMENT_OWNER_RELEASE, &ids(&releases)).await;
    }

    async fn drop_attachments(&self, owner_type: &str, owner_ids: &[DbId]) {
        if owner_ids.is_empty() {
            return;
        }
        let dropped = self
            .attachments
            .remove_where(|a| a.owner_type == owner_type && owner_ids.contains(&a.owner_id))
            .await;
        if !dropped.is_empty() {
            tracing::debug!(owner_type, count = dropped.len(), "Dropped mirrored attachments");
        }
    }

    // -- composite writes ----------------------------------------------------

    /// Create a project with its tracks and references locally.
    ///
    /// Parents are checked before anything is written, so either every row
    /// is created or none is.
    pub async fn create_project_composite(
        &self,
        input: &CreateProjectComposite,
    ) -> Result<(Project, Vec<Track>, Vec<Reference>), CoreError> {
        let project = self.create::<Project>(&input.project).await?;

        let mut tracks = Vec::with_capacity(input.tracks.len());
        for draft in &input.tracks {
            let create = draft.clone().for_project(project.id);
            tracks.push(self.create::<Track>(&create).await?);
        }
        let mut references = Vec::with_capacity(input.references.len());
        for draft in &input.references {
            let create = draft.clone().for_project(project.id);
            references.push(self.create::<Reference>(&create).await?);
        }
        Ok((project, tracks, references))
    }

    /// Insert or update the budget line for (`project_id`, `category`).
    pub async fn upsert_budget(&self, input: &CreateBudget) -> Result<Budget, CoreError> {
        self.check_parents(vec![(EntityKind::Project, input.project_id)])
            .await?;
        let now = Utc::now();
        let budget = self
            .budgets
            .with_rows_mut(|rows| {
                let existing = rows
                    .iter_mut()
                    .find(|b| b.project_id == input.project_id && b.category == input.category);
                match existing {
                    Some(budget) => {
                        if input.description.is_some() {
                            budget.description = input.description.clone();
                        }
                        budget.planned_cents = input.planned_cents;
                        budget.updated_at = now;
                        budget.clone()
                    }
                    None => {
                        let budget = Budget::from_create(self.budgets.next_local_id(), input, now);
                        rows.push(budget.clone());
                        budget
                    }
                }
            })
            .await;
        Ok(budget)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::models::artist::CreateArtist;
    use crate::models::payment::UpdatePayment;
    use crate::models::project::CreateProject;
    use crate::models::reference::ReferenceDraft;
    use crate::models::track::{CreateTrack, TrackDraft};

    fn seeded() -> LocalMirror {
        LocalMirror::load(None).expect("embedded dataset parses")
    }

    fn artist(name: &str) -> CreateArtist {
        CreateArtist {
            name: name.into(),
            stage_name: None,
            genre: None,
            email: None,
            phone: None,
            bio: None,
            photo_url: None,
            social_links: None,
            status: None,
        }
    }

    fn project(artist_id: DbId) -> CreateProject {
        CreateProject {
            artist_id,
            producer_id: None,
            title: "Lado B".into(),
            kind: "ep".into(),
            status: None,
            start_date: None,
            target_release_date: None,
            notes: None,
            tags: None,
        }
    }

    #[tokio::test]
    async fn embedded_dataset_seeds_every_table_with_derived_fields() {
        let mirror = seeded();
        assert_eq!(mirror.list::<Artist>().await.len(), 4);
        assert!(!mirror.list::<Project>().await.is_empty());
        assert!(mirror.list::<Attachment>().await.is_empty());

        let done = mirror.find::<Track>(4).await.unwrap();
        assert!(done.is_complete);
        assert_eq!(done.youtube_id.as_deref(), Some("9bZkp7q19f0"));

        let spotify = mirror.find::<Reference>(3).await.unwrap();
        assert_eq!(spotify.youtube_id, None);
    }

    #[test]
    fn dataset_tables_are_optional() {
        let dataset = MockDataset::from_json(r#"{"artists": []}"#).unwrap();
        assert!(dataset.projects.is_empty());
        assert_matches!(MockDataset::from_json("42"), Err(MirrorError::Parse(_)));
    }

    #[test]
    fn missing_dataset_file_is_a_read_error() {
        let err = LocalMirror::load(Some(Path::new("/nonexistent/labelops.json")));
        assert_matches!(err, Err(MirrorError::Read { .. }));
    }

    #[tokio::test]
    async fn local_creates_get_descending_negative_ids() {
        let mirror = LocalMirror::empty();
        let first = mirror.create::<Artist>(&artist("Ana")).await.unwrap();
        let second = mirror.create::<Artist>(&artist("Bia")).await.unwrap();
        assert_eq!(first.id, -1);
        assert_eq!(second.id, -2);
        assert_eq!(first.status, "active");
    }

    #[tokio::test]
    async fn create_with_unknown_parent_is_rejected() {
        let mirror = LocalMirror::empty();
        let err = mirror.create::<Project>(&project(99)).await.unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidReference {
                entity: "Artist",
                id: 99
            }
        );
        assert!(mirror.list::<Project>().await.is_empty());
    }

    #[tokio::test]
    async fn update_applies_only_present_fields() {
        let mirror = seeded();
        let input = UpdatePayment {
            status: Some("paid".into()),
            ..UpdatePayment::default()
        };
        let paid = mirror.update::<Payment>(6, &input).await.unwrap();
        assert_eq!(paid.status, "paid");
        assert_eq!(paid.paid_on, Some(Utc::now().date_naive()));
        assert_eq!(paid.amount_cents, 200_000);
        assert_eq!(paid.description, "Diárias de estúdio (setembro)");

        let missing = mirror.update::<Payment>(404, &input).await;
        assert_matches!(missing, Err(CoreError::NotFound { entity: "Payment", id: 404 }));
    }

    #[tokio::test]
    async fn update_clears_nullable_fields_sent_as_null() {
        let mirror = seeded();
        let input = UpdatePayment {
            budget_id: Some(None),
            due_date: Some(None),
            method: Some(Some("boleto".into())),
            ..UpdatePayment::default()
        };
        let payment = mirror.update::<Payment>(3, &input).await.unwrap();
        assert_eq!(payment.budget_id, None);
        assert_eq!(payment.due_date, None);
        assert_eq!(payment.method.as_deref(), Some("boleto"));
        // Absent fields are untouched.
        assert_eq!(payment.amount_cents, 300_000);
        assert_eq!(payment.supplier_id, None);
        assert_eq!(payment.description, "Mixagem (sinal)");

        // Marking paid while clearing the date still stamps one.
        let input = UpdatePayment {
            status: Some("paid".into()),
            paid_on: Some(None),
            ..UpdatePayment::default()
        };
        let paid = mirror.update::<Payment>(1, &input).await.unwrap();
        assert_eq!(paid.paid_on, Some(Utc::now().date_naive()));

        // A cleared foreign key is not checked as a parent.
        let input = crate::models::project::UpdateProject {
            producer_id: Some(None),
            ..Default::default()
        };
        let project = mirror.update::<Project>(1, &input).await.unwrap();
        assert_eq!(project.producer_id, None);
    }

    #[tokio::test]
    async fn remote_refresh_drops_unsynced_rows() {
        let mirror = seeded();
        mirror.create::<Artist>(&artist("Local")).await.unwrap();
        let remote = mirror.list::<Artist>().await.into_iter().filter(|a| a.id > 0).take(2).collect();

        mirror.replace::<Artist>(remote).await;

        let artists = mirror.list::<Artist>().await;
        assert_eq!(artists.len(), 2);
        assert!(artists.iter().all(|a| a.id > 0));
    }

    #[tokio::test]
    async fn deleting_an_artist_cascades_like_the_schema() {
        let mirror = seeded();
        assert!(mirror.delete::<Artist>(1).await);

        assert!(mirror.list::<Project>().await.iter().all(|p| p.artist_id != 1));
        // Projects 1 and 4 belonged to artist 1.
        assert!(mirror.list::<Track>().await.iter().all(|t| t.project_id != 1));
        assert!(mirror.list::<Budget>().await.iter().all(|b| b.project_id != 1));
        assert!(mirror.list::<Payment>().await.iter().all(|p| p.project_id != 1));
        assert!(mirror.list::<Release>().await.iter().all(|r| r.project_id != 1));

        let contract = mirror.find::<Document>(1).await.unwrap();
        assert_eq!(contract.artist_id, None);

        assert!(!mirror.delete::<Artist>(1).await);
    }

    #[tokio::test]
    async fn deleting_a_budget_unlinks_its_payments() {
        let mirror = seeded();
        assert!(mirror.delete::<Budget>(1).await);
        let payment = mirror.find::<Payment>(1).await.unwrap();
        assert_eq!(payment.budget_id, None);
        assert_eq!(payment.amount_cents, 800_000);
    }

    fn attachment(id: DbId, owner_type: &str, owner_id: DbId) -> Attachment {
        Attachment {
            id,
            owner_type: owner_type.into(),
            owner_id,
            file_name: format!("nota-{id}.pdf"),
            storage_key: format!("attachments/{owner_type}/{owner_id}/nota-{id}.pdf"),
            public_url: format!("/files/attachments/{owner_type}/{owner_id}/nota-{id}.pdf"),
            mime_type: "application/pdf".into(),
            size_bytes: 1_024,
            created_at: Utc::now(),
        }
    }

    async fn attachment_ids(mirror: &LocalMirror) -> Vec<DbId> {
        let mut ids: Vec<DbId> = mirror.list::<Attachment>().await.iter().map(|a| a.id).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn deleting_an_owner_drops_its_attachments() {
        let mirror = seeded();
        mirror.store(attachment(1, "payment", 1)).await;
        mirror.store(attachment(2, "payment", 4)).await;
        mirror.store(attachment(3, "budget", 1)).await;
        mirror.store(attachment(4, "release", 2)).await;
        mirror.store(attachment(5, "project", 1)).await;
        mirror.store(attachment(6, "project", 4)).await;

        assert!(mirror.delete::<Payment>(4).await);
        assert_eq!(attachment_ids(&mirror).await, vec![1, 3, 4, 5, 6]);

        // Project 1 owns payment 1, budget 1 and release 2.
        assert!(mirror.delete::<Project>(1).await);
        assert_eq!(attachment_ids(&mirror).await, vec![6]);

        // Artist 1 also owns project 4.
        assert!(mirror.delete::<Artist>(1).await);
        assert!(attachment_ids(&mirror).await.is_empty());
    }

    #[tokio::test]
    async fn deleting_a_producer_clears_it_from_projects_and_payments() {
        let mirror = seeded();
        assert!(mirror.delete::<Producer>(1).await);
        assert_eq!(mirror.find::<Project>(1).await.unwrap().producer_id, None);
        assert_eq!(mirror.find::<Payment>(3).await.unwrap().producer_id, None);
    }

    #[tokio::test]
    async fn budget_category_is_unique_per_project() {
        let mirror = seeded();
        let duplicate = CreateBudget {
            project_id: 1,
            category: "Gravação".into(),
            description: None,
            planned_cents: 1,
        };
        let err = mirror.create::<Budget>(&duplicate).await.unwrap_err();
        assert_matches!(err, CoreError::Conflict(_));

        let upserted = mirror.upsert_budget(&duplicate).await.unwrap();
        assert_eq!(upserted.id, 1);
        assert_eq!(upserted.planned_cents, 1);
        assert_eq!(upserted.description.as_deref(), Some("Diárias de estúdio"));

        let fresh = mirror
            .upsert_budget(&CreateBudget {
                category: "Divulgação".into(),
                ..duplicate
            })
            .await
            .unwrap();
        assert!(fresh.id < 0);
    }

    #[tokio::test]
    async fn composite_create_links_children_to_the_new_project() {
        let mirror = seeded();
        let input = CreateProjectComposite {
            project: project(2),
            tracks: vec![
                TrackDraft {
                    title: "Um".into(),
                    ..TrackDraft::default()
                },
                TrackDraft {
                    title: "Dois".into(),
                    track_number: Some(2),
                    ..TrackDraft::default()
                },
            ],
            references: vec![ReferenceDraft {
                title: "Vibe".into(),
                url: "https://youtu.be/dQw4w9WgXcQ".into(),
                ..ReferenceDraft::default()
            }],
        };
        let (project, tracks, references) = mirror.create_project_composite(&input).await.unwrap();
        assert!(project.id < 0);
        assert_eq!(tracks.len(), 2);
        assert!(tracks.iter().all(|t| t.project_id == project.id));
        assert_eq!(tracks[0].track_number, 1);
        assert_eq!(tracks[0].recording_status, "pending");
        assert_eq!(references[0].youtube_id.as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[tokio::test]
    async fn track_updates_recompute_progress() {
        let mirror = seeded();
        let created = mirror
            .create::<Track>(&CreateTrack {
                project_id: 4,
                track: TrackDraft {
                    title: "Demo".into(),
                    ..TrackDraft::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(created.progress_pct, 0.0);

        let input = crate::models::track::UpdateTrack {
            recording_status: Some("done".into()),
            mix_status: Some("done".into()),
            master_status: Some("done".into()),
            ..Default::default()
        };
        let done = mirror.update::<Track>(created.id, &input).await.unwrap();
        assert!(done.is_complete);
        assert_eq!(done.progress_pct, 100.0);
    }
}
