//! Lenient parsing for JSON-string columns.
//!
//! Older rows keep lists (tags, composers, platforms) and maps (social
//! links) as JSON text. A malformed or empty column must never fail a whole
//! list request, so parsing falls back to the type's default.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Parse a JSON-string column, returning `T::default()` when the column is
/// NULL, blank, or not valid JSON for `T`.
pub fn parse_json_field<T>(raw: Option<&str>) -> T
where
    T: DeserializeOwned + Default,
{
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => serde_json::from_str(text).unwrap_or_default(),
        _ => T::default(),
    }
}

/// Serialize a value for storage in a JSON-string column.
///
/// Lists and maps of strings always serialize; the fallback only guards
/// against exotic `Serialize` impls.
pub fn to_json_field<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn parses_valid_list() {
        let tags: Vec<String> = parse_json_field(Some(r#"["pop","verão"]"#));
        assert_eq!(tags, vec!["pop".to_string(), "verão".to_string()]);
    }

    #[test]
    fn null_blank_and_garbage_yield_default() {
        let none: Vec<String> = parse_json_field(None);
        assert!(none.is_empty());
        let blank: Vec<String> = parse_json_field(Some("  "));
        assert!(blank.is_empty());
        let garbage: Vec<String> = parse_json_field(Some("pop, rock"));
        assert!(garbage.is_empty());
        let wrong_shape: Vec<String> = parse_json_field(Some(r#"{"a":"b"}"#));
        assert!(wrong_shape.is_empty());
        let json_null: Vec<String> = parse_json_field(Some("null"));
        assert!(json_null.is_empty());
    }

    #[test]
    fn parses_maps() {
        let links: BTreeMap<String, String> =
            parse_json_field(Some(r#"{"instagram":"@artista"}"#));
        assert_eq!(links.get("instagram").map(String::as_str), Some("@artista"));
    }

    #[test]
    fn serializes_canonically() {
        let tags = vec!["a".to_string(), "b".to_string()];
        assert_eq!(to_json_field(&tags), r#"["a","b"]"#);
        let parsed: Vec<String> = parse_json_field(Some(&to_json_field(&tags)));
        assert_eq!(parsed, tags);
    }
}
