//! Budget versus realized-payment arithmetic.
//!
//! All amounts are integer cents. Percentages are rounded to one decimal
//! place for display.

use std::collections::HashMap;

use serde::Serialize;

use crate::status::{PAYMENT_STATUS_PAID, PAYMENT_STATUS_PENDING};
use crate::types::{Cents, Date, DbId};

/// `part / whole * 100`, rounded to one decimal. Zero when `whole <= 0`.
pub fn percent_of(part: Cents, whole: Cents) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round_one_decimal(part as f64 / whole as f64 * 100.0)
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Payment settlement
// ---------------------------------------------------------------------------

/// Paid and pending sums for a group of payments. Cancelled payments are
/// ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Settled {
    pub paid_cents: Cents,
    pub pending_cents: Cents,
}

impl Settled {
    /// Fold one payment into the sums. Sums saturate instead of wrapping,
    /// since rows loaded from a dataset file skip amount validation.
    pub fn add(&mut self, status: &str, amount_cents: Cents) {
        match status {
            PAYMENT_STATUS_PAID => self.paid_cents = self.paid_cents.saturating_add(amount_cents),
            PAYMENT_STATUS_PENDING => {
                self.pending_cents = self.pending_cents.saturating_add(amount_cents)
            }
            _ => {}
        }
    }

    /// Fold another group's sums into these.
    pub fn absorb(&mut self, other: Settled) {
        self.paid_cents = self.paid_cents.saturating_add(other.paid_cents);
        self.pending_cents = self.pending_cents.saturating_add(other.pending_cents);
    }
}

/// Saturating sum of money amounts.
pub fn sum_cents<I: IntoIterator<Item = Cents>>(amounts: I) -> Cents {
    amounts.into_iter().fold(0, Cents::saturating_add)
}

/// A payment reduced to what settlement needs.
#[derive(Debug, Clone, Copy)]
pub struct PaymentFigure<'a> {
    pub budget_id: Option<DbId>,
    pub amount_cents: Cents,
    pub status: &'a str,
}

/// Group payments by budget line.
///
/// Returns the per-budget sums and the sums of payments with no budget line.
pub fn settle_by_budget<'a, I>(payments: I) -> (HashMap<DbId, Settled>, Settled)
where
    I: IntoIterator<Item = PaymentFigure<'a>>,
{
    let mut by_budget: HashMap<DbId, Settled> = HashMap::new();
    let mut unassigned = Settled::default();
    for payment in payments {
        match payment.budget_id {
            Some(budget_id) => by_budget
                .entry(budget_id)
                .or_default()
                .add(payment.status, payment.amount_cents),
            None => unassigned.add(payment.status, payment.amount_cents),
        }
    }
    (by_budget, unassigned)
}

// ---------------------------------------------------------------------------
// Budget figures
// ---------------------------------------------------------------------------

/// Planned versus realized figures for one budget line or a whole project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetFigures {
    pub planned_cents: Cents,
    pub paid_cents: Cents,
    pub pending_cents: Cents,
    /// `planned - paid`; negative when over budget.
    pub remaining_cents: Cents,
    /// Paid as a percentage of planned.
    pub used_pct: f64,
    /// Paid plus pending as a percentage of planned.
    pub committed_pct: f64,
    pub over_budget: bool,
}

impl BudgetFigures {
    pub fn compute(planned_cents: Cents, settled: Settled) -> Self {
        Self {
            planned_cents,
            paid_cents: settled.paid_cents,
            pending_cents: settled.pending_cents,
            remaining_cents: planned_cents.saturating_sub(settled.paid_cents),
            used_pct: percent_of(settled.paid_cents, planned_cents),
            committed_pct: percent_of(
                settled.paid_cents.saturating_add(settled.pending_cents),
                planned_cents,
            ),
            over_budget: settled.paid_cents > planned_cents,
        }
    }
}

/// When a payment is marked paid without a date, stamp it with `today`.
/// Other statuses keep whatever date they carry.
pub fn resolve_paid_on(status: &str, paid_on: Option<Date>, today: Date) -> Option<Date> {
    if status == PAYMENT_STATUS_PAID && paid_on.is_none() {
        Some(today)
    } else {
        paid_on
    }
}
