//! Update fields that map to nullable columns.
//!
//! Such fields are typed `Option<Option<T>>` and tagged
//! `#[serde(default, deserialize_with = "nullable::deserialize")]`:
//!
//! - key absent: `None`, the column keeps its value
//! - `null`: `Some(None)`, the column is cleared
//! - a value: `Some(Some(v))`, the column is overwritten
//!
//! Repositories bind the pair `(field.is_some(), nullable::value(&field))`
//! into `CASE WHEN $present THEN $value ELSE column END`.

use serde::{Deserialize, Deserializer};

/// Read a present key as `Some`, even when its value is `null`.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The value to store when the field was sent; `None` clears the column.
pub fn value<T>(field: &Option<Option<T>>) -> Option<&T> {
    field.as_ref().and_then(Option::as_ref)
}

/// [`value`] for text columns.
pub fn value_str(field: &Option<Option<String>>) -> Option<&str> {
    value(field).map(String::as_str)
}
