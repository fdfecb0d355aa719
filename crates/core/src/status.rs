//! Status and category vocabularies.
//!
//! Statuses are stored as lowercase text columns. Each vocabulary is a
//! constant list plus a validator that the create/update paths call before
//! touching the database or the local mirror.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Artists
// ---------------------------------------------------------------------------

pub const ARTIST_STATUS_ACTIVE: &str = "active";
pub const ARTIST_STATUS_INACTIVE: &str = "inactive";

pub const ARTIST_STATUSES: &[&str] = &[ARTIST_STATUS_ACTIVE, ARTIST_STATUS_INACTIVE];

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub const PROJECT_KIND_SINGLE: &str = "single";
pub const PROJECT_KIND_EP: &str = "ep";
pub const PROJECT_KIND_ALBUM: &str = "album";

pub const PROJECT_KINDS: &[&str] = &[PROJECT_KIND_SINGLE, PROJECT_KIND_EP, PROJECT_KIND_ALBUM];

pub const PROJECT_STATUS_PLANNING: &str = "planning";
pub const PROJECT_STATUS_PRE_PRODUCTION: &str = "pre_production";
pub const PROJECT_STATUS_RECORDING: &str = "recording";
pub const PROJECT_STATUS_MIXING: &str = "mixing";
pub const PROJECT_STATUS_MASTERING: &str = "mastering";
pub const PROJECT_STATUS_RELEASED: &str = "released";
pub const PROJECT_STATUS_CANCELLED: &str = "cancelled";

/// Project statuses in pipeline order.
pub const PROJECT_STATUSES: &[&str] = &[
    PROJECT_STATUS_PLANNING,
    PROJECT_STATUS_PRE_PRODUCTION,
    PROJECT_STATUS_RECORDING,
    PROJECT_STATUS_MIXING,
    PROJECT_STATUS_MASTERING,
    PROJECT_STATUS_RELEASED,
    PROJECT_STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

pub const STAGE_PENDING: &str = "pending";
pub const STAGE_IN_PROGRESS: &str = "in_progress";
pub const STAGE_DONE: &str = "done";

/// Valid values for a track's recording, mix and master columns.
pub const STAGE_STATUSES: &[&str] = &[STAGE_PENDING, STAGE_IN_PROGRESS, STAGE_DONE];

/// Where a single production stage of a track stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    InProgress,
    Done,
}

impl StageStatus {
    /// Parse from the database column. Unknown values count as pending so a
    /// stray legacy value never inflates progress.
    pub fn from_name(name: &str) -> Self {
        match name {
            STAGE_IN_PROGRESS => Self::InProgress,
            STAGE_DONE => Self::Done,
            _ => Self::Pending,
        }
    }

    /// Contribution of this stage to track progress, in `[0, 1]`.
    pub fn weight(self) -> f64 {
        match self {
            Self::Pending => 0.0,
            Self::InProgress => 0.5,
            Self::Done => 1.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => STAGE_PENDING,
            Self::InProgress => STAGE_IN_PROGRESS,
            Self::Done => STAGE_DONE,
        }
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

pub const PAYMENT_STATUS_PENDING: &str = "pending";
pub const PAYMENT_STATUS_PAID: &str = "paid";
pub const PAYMENT_STATUS_CANCELLED: &str = "cancelled";

pub const PAYMENT_STATUSES: &[&str] = &[
    PAYMENT_STATUS_PENDING,
    PAYMENT_STATUS_PAID,
    PAYMENT_STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Releases
// ---------------------------------------------------------------------------

pub const RELEASE_STATUS_SCHEDULED: &str = "scheduled";
pub const RELEASE_STATUS_RELEASED: &str = "released";
pub const RELEASE_STATUS_CANCELLED: &str = "cancelled";

pub const RELEASE_STATUSES: &[&str] = &[
    RELEASE_STATUS_SCHEDULED,
    RELEASE_STATUS_RELEASED,
    RELEASE_STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Documents and attachments
// ---------------------------------------------------------------------------

pub const DOCUMENT_CATEGORIES: &[&str] =
    &["contract", "invoice", "receipt", "artwork", "press", "other"];

pub const ATTACHMENT_OWNER_PROJECT: &str = "project";
pub const ATTACHMENT_OWNER_PAYMENT: &str = "payment";
pub const ATTACHMENT_OWNER_BUDGET: &str = "budget";
pub const ATTACHMENT_OWNER_RELEASE: &str = "release";

pub const ATTACHMENT_OWNER_TYPES: &[&str] = &[
    ATTACHMENT_OWNER_PROJECT,
    ATTACHMENT_OWNER_PAYMENT,
    ATTACHMENT_OWNER_BUDGET,
    ATTACHMENT_OWNER_RELEASE,
];

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

fn validate_one_of(label: &str, value: &str, valid: &[&str]) -> Result<(), CoreError> {
    if valid.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {label} '{value}'. Must be one of: {}",
            valid.join(", ")
        )))
    }
}

pub fn validate_artist_status(value: &str) -> Result<(), CoreError> {
    validate_one_of("artist status", value, ARTIST_STATUSES)
}

pub fn validate_project_kind(value: &str) -> Result<(), CoreError> {
    validate_one_of("project kind", value, PROJECT_KINDS)
}

pub fn validate_project_status(value: &str) -> Result<(), CoreError> {
    validate_one_of("project status", value, PROJECT_STATUSES)
}

pub fn validate_stage_status(value: &str) -> Result<(), CoreError> {
    validate_one_of("stage status", value, STAGE_STATUSES)
}

pub fn validate_payment_status(value: &str) -> Result<(), CoreError> {
    validate_one_of("payment status", value, PAYMENT_STATUSES)
}

pub fn validate_release_status(value: &str) -> Result<(), CoreError> {
    validate_one_of("release status", value, RELEASE_STATUSES)
}

pub fn validate_document_category(value: &str) -> Result<(), CoreError> {
    validate_one_of("document category", value, DOCUMENT_CATEGORIES)
}

pub fn validate_attachment_owner_type(value: &str) -> Result<(), CoreError> {
    validate_one_of("attachment owner type", value, ATTACHMENT_OWNER_TYPES)
}
