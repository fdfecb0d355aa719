//! Domain logic for the label operations backend.
//!
//! Everything in this crate is pure: no database, no network, no filesystem.
//! The db and api crates call into it for validation, filtering and the
//! derived figures shown on the dashboard.

pub mod error;
pub mod finance;
pub mod json_field;
pub mod nullable;
pub mod progress;
pub mod schedule;
pub mod search;
pub mod status;
pub mod storage;
pub mod types;
pub mod validation;
pub mod youtube;
