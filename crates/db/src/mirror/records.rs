//! [`MirrorRecord`] and [`LocalWrite`] for every model.
//!
//! Local creates fill the same defaults the database columns have; local
//! updates apply only the present fields and clear nullable ones sent as
//! `null`, like the repositories' updates.

use labelops_core::finance::resolve_paid_on;
use labelops_core::status::{
    ARTIST_STATUS_ACTIVE, PAYMENT_STATUS_PAID, PAYMENT_STATUS_PENDING, PROJECT_STATUS_PLANNING,
    RELEASE_STATUS_SCHEDULED, STAGE_PENDING,
};
use labelops_core::types::{DbId, Timestamp};

use super::{EntityKind, LocalMirror, LocalWrite, MirrorRecord, MirrorTable};
use crate::models::artist::{Artist, CreateArtist, UpdateArtist};
use crate::models::attachment::Attachment;
use crate::models::budget::{Budget, CreateBudget, UpdateBudget};
use crate::models::document::Document;
use crate::models::payment::{CreatePayment, Payment, UpdatePayment};
use crate::models::producer::{CreateProducer, Producer, UpdateProducer};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::reference::{CreateReference, Reference, UpdateReference};
use crate::models::release::{CreateRelease, Release, UpdateRelease};
use crate::models::supplier::{CreateSupplier, Supplier, UpdateSupplier};
use crate::models::track::{CreateTrack, Track, UpdateTrack};

/// Overwrite `slot` when `value` is present.
fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *slot = value.clone();
    }
}

/// Overwrite a nullable `slot` when `value` is present, clearing it on
/// `Some(None)`.
fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<Option<T>>) {
    if let Some(value) = value {
        slot.clone_from(value);
    }
}

fn optional_parent(kind: EntityKind, id: Option<DbId>) -> Option<(EntityKind, DbId)> {
    id.map(|id| (kind, id))
}

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

impl MirrorRecord for Artist {
    const KIND: EntityKind = EntityKind::Artist;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.artists
    }
}

impl LocalWrite for Artist {
    type Create = CreateArtist;
    type Update = UpdateArtist;

    fn from_create(id: DbId, input: &CreateArtist, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            stage_name: input.stage_name.clone(),
            genre: input.genre.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            bio: input.bio.clone(),
            photo_url: input.photo_url.clone(),
            social_links: input.social_links.clone().unwrap_or_default(),
            status: input
                .status
                .clone()
                .unwrap_or_else(|| ARTIST_STATUS_ACTIVE.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateArtist, now: Timestamp) {
        set(&mut self.name, &input.name);
        set_opt(&mut self.stage_name, &input.stage_name);
        set_opt(&mut self.genre, &input.genre);
        set_opt(&mut self.email, &input.email);
        set_opt(&mut self.phone, &input.phone);
        set_opt(&mut self.bio, &input.bio);
        set_opt(&mut self.photo_url, &input.photo_url);
        set(&mut self.social_links, &input.social_links);
        set(&mut self.status, &input.status);
        self.updated_at = now;
    }

    fn create_parents(_input: &CreateArtist) -> Vec<(EntityKind, DbId)> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

impl MirrorRecord for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.projects
    }
}

impl LocalWrite for Project {
    type Create = CreateProject;
    type Update = UpdateProject;

    fn from_create(id: DbId, input: &CreateProject, now: Timestamp) -> Self {
        Self {
            id,
            artist_id: input.artist_id,
            producer_id: input.producer_id,
            title: input.title.clone(),
            kind: input.kind.clone(),
            status: input
                .status
                .clone()
                .unwrap_or_else(|| PROJECT_STATUS_PLANNING.to_string()),
            start_date: input.start_date,
            target_release_date: input.target_release_date,
            notes: input.notes.clone(),
            tags: input.tags.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateProject, now: Timestamp) {
        set(&mut self.artist_id, &input.artist_id);
        set_opt(&mut self.producer_id, &input.producer_id);
        set(&mut self.title, &input.title);
        set(&mut self.kind, &input.kind);
        set(&mut self.status, &input.status);
        set_opt(&mut self.start_date, &input.start_date);
        set_opt(&mut self.target_release_date, &input.target_release_date);
        set_opt(&mut self.notes, &input.notes);
        set(&mut self.tags, &input.tags);
        self.updated_at = now;
    }

    fn create_parents(input: &CreateProject) -> Vec<(EntityKind, DbId)> {
        std::iter::once((EntityKind::Artist, input.artist_id))
            .chain(optional_parent(EntityKind::Producer, input.producer_id))
            .collect()
    }

    fn update_parents(input: &UpdateProject) -> Vec<(EntityKind, DbId)> {
        [
            optional_parent(EntityKind::Artist, input.artist_id),
            optional_parent(EntityKind::Producer, input.producer_id.flatten()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

impl MirrorRecord for Track {
    const KIND: EntityKind = EntityKind::Track;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.tracks
    }

    fn refresh(&mut self) {
        self.refresh_derived();
    }
}

impl LocalWrite for Track {
    type Create = CreateTrack;
    type Update = UpdateTrack;

    fn from_create(id: DbId, input: &CreateTrack, now: Timestamp) -> Self {
        let draft = &input.track;
        let stage = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| STAGE_PENDING.to_string())
        };
        Self {
            id,
            project_id: input.project_id,
            title: draft.title.clone(),
            track_number: draft.track_number.unwrap_or(1),
            duration_secs: draft.duration_secs,
            isrc: draft.isrc.clone(),
            composers: draft.composers.clone().unwrap_or_default(),
            recording_status: stage(&draft.recording_status),
            mix_status: stage(&draft.mix_status),
            master_status: stage(&draft.master_status),
            youtube_url: draft.youtube_url.clone(),
            notes: draft.notes.clone(),
            created_at: now,
            updated_at: now,
            youtube_id: None,
            progress_pct: 0.0,
            is_complete: false,
        }
    }

    fn apply_update(&mut self, input: &UpdateTrack, now: Timestamp) {
        set(&mut self.title, &input.title);
        set(&mut self.track_number, &input.track_number);
        set_opt(&mut self.duration_secs, &input.duration_secs);
        set_opt(&mut self.isrc, &input.isrc);
        set(&mut self.composers, &input.composers);
        set(&mut self.recording_status, &input.recording_status);
        set(&mut self.mix_status, &input.mix_status);
        set(&mut self.master_status, &input.master_status);
        set_opt(&mut self.youtube_url, &input.youtube_url);
        set_opt(&mut self.notes, &input.notes);
        self.updated_at = now;
    }

    fn create_parents(input: &CreateTrack) -> Vec<(EntityKind, DbId)> {
        vec![(EntityKind::Project, input.project_id)]
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

impl MirrorRecord for Reference {
    const KIND: EntityKind = EntityKind::Reference;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.references
    }

    fn refresh(&mut self) {
        self.refresh_derived();
    }
}

impl LocalWrite for Reference {
    type Create = CreateReference;
    type Update = UpdateReference;

    fn from_create(id: DbId, input: &CreateReference, now: Timestamp) -> Self {
        let draft = &input.reference;
        Self {
            id,
            project_id: input.project_id,
            title: draft.title.clone(),
            artist_name: draft.artist_name.clone(),
            url: draft.url.clone(),
            notes: draft.notes.clone(),
            created_at: now,
            youtube_id: None,
        }
    }

    fn apply_update(&mut self, input: &UpdateReference, _now: Timestamp) {
        set(&mut self.title, &input.title);
        set_opt(&mut self.artist_name, &input.artist_name);
        set(&mut self.url, &input.url);
        set_opt(&mut self.notes, &input.notes);
    }

    fn create_parents(input: &CreateReference) -> Vec<(EntityKind, DbId)> {
        vec![(EntityKind::Project, input.project_id)]
    }
}

// ---------------------------------------------------------------------------
// Budgets
// ---------------------------------------------------------------------------

impl MirrorRecord for Budget {
    const KIND: EntityKind = EntityKind::Budget;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.budgets
    }
}

impl LocalWrite for Budget {
    type Create = CreateBudget;
    type Update = UpdateBudget;

    fn from_create(id: DbId, input: &CreateBudget, now: Timestamp) -> Self {
        Self {
            id,
            project_id: input.project_id,
            category: input.category.clone(),
            description: input.description.clone(),
            planned_cents: input.planned_cents,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateBudget, now: Timestamp) {
        set(&mut self.category, &input.category);
        set_opt(&mut self.description, &input.description);
        set(&mut self.planned_cents, &input.planned_cents);
        self.updated_at = now;
    }

    fn create_parents(input: &CreateBudget) -> Vec<(EntityKind, DbId)> {
        vec![(EntityKind::Project, input.project_id)]
    }

    /// One line per project and category, like `uq_budgets_project_category`.
    fn unique_key(&self) -> Option<String> {
        Some(format!("project {} / {}", self.project_id, self.category))
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

impl MirrorRecord for Payment {
    const KIND: EntityKind = EntityKind::Payment;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.payments
    }
}

impl LocalWrite for Payment {
    type Create = CreatePayment;
    type Update = UpdatePayment;

    fn from_create(id: DbId, input: &CreatePayment, now: Timestamp) -> Self {
        let status = input
            .status
            .clone()
            .unwrap_or_else(|| PAYMENT_STATUS_PENDING.to_string());
        let paid_on = resolve_paid_on(&status, input.paid_on, now.date_naive());
        Self {
            id,
            project_id: input.project_id,
            budget_id: input.budget_id,
            supplier_id: input.supplier_id,
            producer_id: input.producer_id,
            description: input.description.clone(),
            amount_cents: input.amount_cents,
            status,
            due_date: input.due_date,
            paid_on,
            method: input.method.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdatePayment, now: Timestamp) {
        set_opt(&mut self.budget_id, &input.budget_id);
        set_opt(&mut self.supplier_id, &input.supplier_id);
        set_opt(&mut self.producer_id, &input.producer_id);
        set(&mut self.description, &input.description);
        set(&mut self.amount_cents, &input.amount_cents);
        set(&mut self.status, &input.status);
        set_opt(&mut self.due_date, &input.due_date);
        set_opt(&mut self.paid_on, &input.paid_on);
        if input.status.as_deref() == Some(PAYMENT_STATUS_PAID) {
            self.paid_on = resolve_paid_on(PAYMENT_STATUS_PAID, self.paid_on, now.date_naive());
        }
        set_opt(&mut self.method, &input.method);
        self.updated_at = now;
    }

    fn create_parents(input: &CreatePayment) -> Vec<(EntityKind, DbId)> {
        std::iter::once((EntityKind::Project, input.project_id))
            .chain(optional_parent(EntityKind::Budget, input.budget_id))
            .chain(optional_parent(EntityKind::Supplier, input.supplier_id))
            .chain(optional_parent(EntityKind::Producer, input.producer_id))
            .collect()
    }

    fn update_parents(input: &UpdatePayment) -> Vec<(EntityKind, DbId)> {
        [
            optional_parent(EntityKind::Budget, input.budget_id.flatten()),
            optional_parent(EntityKind::Supplier, input.supplier_id.flatten()),
            optional_parent(EntityKind::Producer, input.producer_id.flatten()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Suppliers and producers
// ---------------------------------------------------------------------------

impl MirrorRecord for Supplier {
    const KIND: EntityKind = EntityKind::Supplier;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.suppliers
    }
}

impl LocalWrite for Supplier {
    type Create = CreateSupplier;
    type Update = UpdateSupplier;

    fn from_create(id: DbId, input: &CreateSupplier, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            service_type: input.service_type.clone(),
            contact_name: input.contact_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            tax_id: input.tax_id.clone(),
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateSupplier, now: Timestamp) {
        set(&mut self.name, &input.name);
        set_opt(&mut self.service_type, &input.service_type);
        set_opt(&mut self.contact_name, &input.contact_name);
        set_opt(&mut self.email, &input.email);
        set_opt(&mut self.phone, &input.phone);
        set_opt(&mut self.tax_id, &input.tax_id);
        set_opt(&mut self.notes, &input.notes);
        self.updated_at = now;
    }

    fn create_parents(_input: &CreateSupplier) -> Vec<(EntityKind, DbId)> {
        Vec::new()
    }
}

impl MirrorRecord for Producer {
    const KIND: EntityKind = EntityKind::Producer;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.producers
    }
}

impl LocalWrite for Producer {
    type Create = CreateProducer;
    type Update = UpdateProducer;

    fn from_create(id: DbId, input: &CreateProducer, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name.clone(),
            specialty: input.specialty.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            fee_cents: input.fee_cents,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateProducer, now: Timestamp) {
        set(&mut self.name, &input.name);
        set_opt(&mut self.specialty, &input.specialty);
        set_opt(&mut self.email, &input.email);
        set_opt(&mut self.phone, &input.phone);
        set_opt(&mut self.fee_cents, &input.fee_cents);
        set_opt(&mut self.notes, &input.notes);
        self.updated_at = now;
    }

    fn create_parents(_input: &CreateProducer) -> Vec<(EntityKind, DbId)> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Releases
// ---------------------------------------------------------------------------

impl MirrorRecord for Release {
    const KIND: EntityKind = EntityKind::Release;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.releases
    }
}

impl LocalWrite for Release {
    type Create = CreateRelease;
    type Update = UpdateRelease;

    fn from_create(id: DbId, input: &CreateRelease, now: Timestamp) -> Self {
        Self {
            id,
            project_id: input.project_id,
            title: input.title.clone(),
            release_date: input.release_date,
            status: input
                .status
                .clone()
                .unwrap_or_else(|| RELEASE_STATUS_SCHEDULED.to_string()),
            distributor: input.distributor.clone(),
            upc: input.upc.clone(),
            platforms: input.platforms.clone().unwrap_or_default(),
            cover_url: input.cover_url.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, input: &UpdateRelease, now: Timestamp) {
        set(&mut self.title, &input.title);
        set_opt(&mut self.release_date, &input.release_date);
        set(&mut self.status, &input.status);
        set_opt(&mut self.distributor, &input.distributor);
        set_opt(&mut self.upc, &input.upc);
        set(&mut self.platforms, &input.platforms);
        set_opt(&mut self.cover_url, &input.cover_url);
        self.updated_at = now;
    }

    fn create_parents(input: &CreateRelease) -> Vec<(EntityKind, DbId)> {
        vec![(EntityKind::Project, input.project_id)]
    }
}

// ---------------------------------------------------------------------------
// Stored files (read fallback only)
// ---------------------------------------------------------------------------

impl MirrorRecord for Document {
    const KIND: EntityKind = EntityKind::Document;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.documents
    }
}

impl MirrorRecord for Attachment {
    const KIND: EntityKind = EntityKind::Attachment;

    fn id(&self) -> DbId {
        self.id
    }

    fn table(mirror: &LocalMirror) -> &MirrorTable<Self> {
        &mirror.attachments
    }
}
