//! In-memory text filtering for list endpoints.
//!
//! Lists are small (tens to low hundreds of rows), so filtering happens by
//! direct iteration after the rows are loaded, whether they came from the
//! database or from the local mirror.

/// Rows that can be matched against a free-text query.
pub trait Searchable {
    /// Text fields the query is matched against. `None` entries are skipped.
    fn search_fields(&self) -> Vec<Option<&str>>;
}

/// Normalize a raw `?q=` value. Returns `None` when the query is blank,
/// meaning "match everything".
pub fn normalize_query(raw: Option<&str>) -> Option<String> {
    raw.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty())
}

/// Case-insensitive substring match of an already-normalized query against
/// any of the row's searchable fields.
pub fn matches_query<T: Searchable + ?Sized>(row: &T, normalized: &str) -> bool {
    row.search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(normalized))
}

/// Keep the rows matching `raw_query`; a blank query keeps everything.
pub fn filter_rows<T: Searchable>(rows: Vec<T>, raw_query: Option<&str>) -> Vec<T> {
    match normalize_query(raw_query) {
        Some(query) => rows
            .into_iter()
            .filter(|row| matches_query(row, &query))
            .collect(),
        None => rows,
    }
}
