//! Shared query parameter types for API handlers.
//!
//! Every list endpoint accepts `?q=`, a case-insensitive substring filter
//! over the entity's searchable fields. Entity-specific filters are applied
//! in memory after the load, so they behave the same on remote and fallback
//! reads.

use labelops_core::types::DbId;
use serde::Deserialize;

/// `?q=` only.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArtistListParams {
    pub q: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    pub q: Option<String>,
    pub artist_id: Option<DbId>,
    pub status: Option<String>,
    pub kind: Option<String>,
}

/// `?q=&project_id=`, shared by tracks, budgets, releases and references.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectScopedParams {
    pub q: Option<String>,
    pub project_id: Option<DbId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentListParams {
    pub q: Option<String>,
    pub project_id: Option<DbId>,
    pub budget_id: Option<DbId>,
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentListParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub artist_id: Option<DbId>,
    pub project_id: Option<DbId>,
}

/// Attachments are only ever listed for one owner.
#[derive(Debug, Deserialize)]
pub struct AttachmentListParams {
    pub owner_type: String,
    pub owner_id: DbId,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    /// Upcoming-release window in days; clamped to `0..=366`.
    pub horizon_days: Option<i64>,
}

/// True when `filter` is unset or equals `value`.
pub fn matches<T: PartialEq + ?Sized>(filter: Option<&T>, value: &T) -> bool {
    filter.map_or(true, |f| f == value)
}

/// Like [`matches`] for nullable columns.
pub fn matches_opt<T: PartialEq + Copy>(filter: Option<T>, value: Option<T>) -> bool {
    filter.map_or(true, |f| value == Some(f))
}
