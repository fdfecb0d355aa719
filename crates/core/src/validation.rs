//! Field-level validation shared by every create/update DTO.
//!
//! The dashboard forms only enforce required-field presence and a handful
//! of shape checks; these helpers produce the matching `CoreError::Validation`
//! messages so the api crate can return them verbatim.

use crate::error::CoreError;
use crate::types::Cents;

/// Largest accepted money amount: ten trillion in whole currency units.
/// Totals over a dashboard-sized dataset stay far below `i64::MAX`.
pub const MAX_CENTS: Cents = 1_000_000_000_000_000;

/// Ensure a required text field is present and not blank.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::Validation(format!("'{field}' is required")))
    } else {
        Ok(())
    }
}

/// Ensure an optional text field, when supplied, is not blank.
///
/// Used on update DTOs where `None` means "leave unchanged" but an empty
/// string for a required column would blank it out.
pub fn require_non_empty_if_present(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) => require_non_empty(field, v),
        None => Ok(()),
    }
}

/// Ensure a money amount (in cents) lies in `0..=MAX_CENTS`.
pub fn validate_cents(field: &str, cents: Cents) -> Result<(), CoreError> {
    if cents < 0 {
        Err(CoreError::Validation(format!(
            "'{field}' must not be negative, got {cents}"
        )))
    } else if cents > MAX_CENTS {
        Err(CoreError::Validation(format!(
            "'{field}' must be at most {MAX_CENTS}, got {cents}"
        )))
    } else {
        Ok(())
    }
}

/// Ensure an integer is at least `min`.
pub fn validate_min_i32(field: &str, value: i32, min: i32) -> Result<(), CoreError> {
    if value < min {
        Err(CoreError::Validation(format!(
            "'{field}' must be at least {min}, got {value}"
        )))
    } else {
        Ok(())
    }
}

/// Loose e-mail shape check: one `@`, non-empty local part, a dot in the domain.
pub fn validate_email(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "'{field}' is not a valid e-mail address"
        )))
    }
}

/// Ensure a URL uses http or https.
pub fn validate_http_url(field: &str, value: &str) -> Result<(), CoreError> {
    let lower = value.trim().to_ascii_lowercase();
    let rest = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "'{field}' must be an http(s) URL"
        ))),
    }
}

/// Treat blank optional strings as absent.
///
/// Form payloads send `""` for untouched inputs; storing those as NULL keeps
/// the columns meaningful.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
