//! Handlers for the dashboard overview.
//!
//! The overview is computed in memory from whole-table loads, so it looks
//! the same whether the tables came from the database or the mirror.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use labelops_core::finance::{percent_of, sum_cents, Settled};
use labelops_core::schedule::{clamp_horizon, days_until, is_payment_overdue, is_release_upcoming};
use labelops_core::status::{ARTIST_STATUS_ACTIVE, PROJECT_STATUSES};
use labelops_core::types::{Cents, Date};
use labelops_db::models::artist::Artist;
use labelops_db::models::budget::Budget;
use labelops_db::models::payment::Payment;
use labelops_db::models::producer::Producer;
use labelops_db::models::project::Project;
use labelops_db::models::release::Release;
use labelops_db::models::supplier::Supplier;
use labelops_db::models::track::Track;
use labelops_db::repositories::{
    ArtistRepo, BudgetRepo, PaymentRepo, ProducerRepo, ProjectRepo, ReleaseRepo, SupplierRepo,
    TrackRepo,
};
use serde::Serialize;

use crate::data_access;
use crate::error::AppResult;
use crate::query::DashboardParams;
use crate::response::Loaded;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct EntityCounts {
    pub artists: usize,
    pub active_artists: usize,
    pub projects: usize,
    pub tracks: usize,
    pub releases: usize,
    pub suppliers: usize,
    pub producers: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: &'static str,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct FinanceTotals {
    pub planned_cents: Cents,
    pub paid_cents: Cents,
    pub pending_cents: Cents,
    /// Paid as a percentage of planned.
    pub used_pct: f64,
}

#[derive(Debug, Serialize)]
pub struct OverduePayment {
    pub payment: Payment,
    pub days_overdue: i64,
}

#[derive(Debug, Serialize)]
pub struct UpcomingRelease {
    pub release: Release,
    pub days_until: i64,
}

#[derive(Debug, Serialize)]
pub struct TrackCounts {
    pub total: usize,
    pub in_progress: usize,
    pub complete: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub today: Date,
    pub horizon_days: i64,
    pub counts: EntityCounts,
    /// Every project status in pipeline order, zeros included.
    pub projects_by_status: Vec<StatusCount>,
    pub finance: FinanceTotals,
    /// Oldest due date first.
    pub overdue_payments: Vec<OverduePayment>,
    /// Soonest first.
    pub upcoming_releases: Vec<UpcomingRelease>,
    pub tracks: TrackCounts,
}

/// The tables the overview is computed from.
pub struct Tables {
    pub artists: Vec<Artist>,
    pub projects: Vec<Project>,
    pub tracks: Vec<Track>,
    pub budgets: Vec<Budget>,
    pub payments: Vec<Payment>,
    pub releases: Vec<Release>,
    pub suppliers: Vec<Supplier>,
    pub producers: Vec<Producer>,
}

pub fn build_overview(tables: Tables, today: Date, horizon_days: i64) -> DashboardOverview {
    let Tables {
        artists,
        projects,
        tracks,
        budgets,
        payments,
        releases,
        suppliers,
        producers,
    } = tables;

    let counts = EntityCounts {
        artists: artists.len(),
        active_artists: artists
            .iter()
            .filter(|a| a.status == ARTIST_STATUS_ACTIVE)
            .count(),
        projects: projects.len(),
        tracks: tracks.len(),
        releases: releases.len(),
        suppliers: suppliers.len(),
        producers: producers.len(),
    };

    let projects_by_status = PROJECT_STATUSES
        .iter()
        .map(|&status| StatusCount {
            status,
            count: projects.iter().filter(|p| p.status == status).count(),
        })
        .collect();

    let planned_cents: Cents = sum_cents(budgets.iter().map(|b| b.planned_cents));
    let mut settled = Settled::default();
    for payment in &payments {
        settled.add(&payment.status, payment.amount_cents);
    }
    let finance = FinanceTotals {
        planned_cents,
        paid_cents: settled.paid_cents,
        pending_cents: settled.pending_cents,
        used_pct: percent_of(settled.paid_cents, planned_cents),
    };

    let mut overdue_payments: Vec<OverduePayment> = payments
        .into_iter()
        .filter(|p| is_payment_overdue(&p.status, p.due_date, today))
        .filter_map(|payment| {
            let due = payment.due_date?;
            Some(OverduePayment {
                days_overdue: -days_until(due, today),
                payment,
            })
        })
        .collect();
    overdue_payments.sort_by_key(|o| (o.payment.due_date, o.payment.id));

    let mut upcoming_releases: Vec<UpcomingRelease> = releases
        .into_iter()
        .filter(|r| is_release_upcoming(&r.status, r.release_date, today, horizon_days))
        .filter_map(|release| {
            let date = release.release_date?;
            Some(UpcomingRelease {
                days_until: days_until(date, today),
                release,
            })
        })
        .collect();
    upcoming_releases.sort_by_key(|u| (u.release.release_date, u.release.id));

    let tracks = TrackCounts {
        total: tracks.len(),
        in_progress: tracks.iter().filter(|t| t.stages().is_in_progress()).count(),
        complete: tracks.iter().filter(|t| t.is_complete).count(),
    };

    DashboardOverview {
        today,
        horizon_days,
        counts,
        projects_by_status,
        finance,
        overdue_payments,
        upcoming_releases,
        tracks,
    }
}

/// GET /api/v1/dashboard/overview?horizon_days=
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<Loaded<DashboardOverview>>> {
    let pool = &state.pool;
    let (artists, projects, tracks, budgets, payments, releases, suppliers, producers) = tokio::join!(
        data_access::load_all(&state, ArtistRepo::list(pool)),
        data_access::load_all(&state, ProjectRepo::list(pool)),
        data_access::load_all(&state, TrackRepo::list(pool)),
        data_access::load_all(&state, BudgetRepo::list(pool)),
        data_access::load_all(&state, PaymentRepo::list(pool)),
        data_access::load_all(&state, ReleaseRepo::list(pool)),
        data_access::load_all(&state, SupplierRepo::list(pool)),
        data_access::load_all(&state, ProducerRepo::list(pool)),
    );
    let (artists, projects, tracks, budgets, payments, releases, suppliers, producers) = (
        artists?, projects?, tracks?, budgets?, payments?, releases?, suppliers?, producers?,
    );

    let source = [
        projects.source,
        tracks.source,
        budgets.source,
        payments.source,
        releases.source,
        suppliers.source,
        producers.source,
    ]
    .into_iter()
    .fold(artists.source, |acc, s| acc.combine(s));

    let tables = Tables {
        artists: artists.data,
        projects: projects.data,
        tracks: tracks.data,
        budgets: budgets.data,
        payments: payments.data,
        releases: releases.data,
        suppliers: suppliers.data,
        producers: producers.data,
    };
    let today = Utc::now().date_naive();
    let overview = build_overview(tables, today, clamp_horizon(params.horizon_days));
    Ok(Json(Loaded {
        data: overview,
        source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelops_db::mirror::MockDataset;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn seed_tables() -> Tables {
        let seed = MockDataset::embedded().unwrap();
        let mut tracks = seed.tracks;
        for track in &mut tracks {
            track.refresh_derived();
        }
        Tables {
            artists: seed.artists,
            projects: seed.projects,
            tracks,
            budgets: seed.budgets,
            payments: seed.payments,
            releases: seed.releases,
            suppliers: seed.suppliers,
            producers: seed.producers,
        }
    }

    #[test]
    fn counts_cover_the_seed() {
        let overview = build_overview(seed_tables(), d(2026, 10, 18), 30);
        assert_eq!(overview.counts.artists, 4);
        assert_eq!(overview.counts.active_artists, 3);
        assert_eq!(overview.counts.projects, 4);
        assert_eq!(overview.projects_by_status.len(), PROJECT_STATUSES.len());
        let total: usize = overview.projects_by_status.iter().map(|s| s.count).sum();
        assert_eq!(total, 4);
        assert!(overview.tracks.complete >= 1);
    }

    #[test]
    fn overdue_and_upcoming_depend_on_today() {
        // Payment 6 is pending and due 2026-09-30.
        let overview = build_overview(seed_tables(), d(2026, 10, 18), 30);
        let overdue = overview
            .overdue_payments
            .iter()
            .find(|o| o.payment.id == 6)
            .expect("payment 6 overdue");
        assert_eq!(overdue.days_overdue, 18);

        let earlier = build_overview(seed_tables(), d(2026, 9, 1), 30);
        assert!(earlier.overdue_payments.iter().all(|o| o.payment.id != 6));

        // Release 2 is scheduled for 2026-11-20.
        let overview = build_overview(seed_tables(), d(2026, 11, 1), 30);
        let upcoming = overview
            .upcoming_releases
            .iter()
            .find(|u| u.release.id == 2)
            .expect("release 2 upcoming");
        assert_eq!(upcoming.days_until, 19);

        let short = build_overview(seed_tables(), d(2026, 11, 1), 7);
        assert!(short.upcoming_releases.iter().all(|u| u.release.id != 2));
    }

    #[test]
    fn cancelled_payments_do_not_count() {
        let mut tables = seed_tables();
        for payment in &mut tables.payments {
            payment.status = "cancelled".into();
        }
        let overview = build_overview(tables, d(2026, 10, 18), 30);
        assert_eq!(overview.finance.paid_cents, 0);
        assert_eq!(overview.finance.pending_cents, 0);
        assert!(overview.overdue_payments.is_empty());
    }

    #[test]
    fn huge_amounts_saturate_finance_totals() {
        let mut tables = seed_tables();
        for budget in &mut tables.budgets {
            budget.planned_cents = i64::MAX;
        }
        for payment in &mut tables.payments {
            payment.amount_cents = i64::MAX;
        }
        let overview = build_overview(tables, d(2026, 10, 18), 30);
        assert_eq!(overview.finance.planned_cents, i64::MAX);
        assert_eq!(overview.finance.paid_cents, i64::MAX);
        assert_eq!(overview.finance.pending_cents, i64::MAX);
        assert_eq!(overview.finance.used_pct, 100.0);
    }
}
