//! Date rules for overdue payments and upcoming releases.

use crate::status::{PAYMENT_STATUS_PENDING, RELEASE_STATUS_SCHEDULED};
use crate::types::Date;

/// Default look-ahead for the upcoming-releases list.
pub const DEFAULT_RELEASE_HORIZON_DAYS: i64 = 30;

/// Maximum look-ahead accepted from callers.
pub const MAX_RELEASE_HORIZON_DAYS: i64 = 366;

/// A payment is overdue when it is still pending and its due date has passed.
pub fn is_payment_overdue(status: &str, due_date: Option<Date>, today: Date) -> bool {
    status == PAYMENT_STATUS_PENDING && due_date.is_some_and(|due| due < today)
}

/// A release is upcoming when it is scheduled for a date between today and
/// `today + horizon_days`, both inclusive.
pub fn is_release_upcoming(
    status: &str,
    release_date: Option<Date>,
    today: Date,
    horizon_days: i64,
) -> bool {
    if status != RELEASE_STATUS_SCHEDULED {
        return false;
    }
    match release_date {
        Some(date) => {
            let days = days_until(date, today);
            (0..=horizon_days).contains(&days)
        }
        None => false,
    }
}

/// Whole days from `today` until `date` (negative when in the past).
pub fn days_until(date: Date, today: Date) -> i64 {
    (date - today).num_days()
}

/// Clamp a caller-supplied horizon into `[0, MAX_RELEASE_HORIZON_DAYS]`.
pub fn clamp_horizon(horizon_days: Option<i64>) -> i64 {
    horizon_days
        .unwrap_or(DEFAULT_RELEASE_HORIZON_DAYS)
        .clamp(0, MAX_RELEASE_HORIZON_DAYS)
}
