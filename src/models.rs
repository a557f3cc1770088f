//! Domain models that mirror the reference store and get handed to callers.
//! The types stay light-weight data holders so the query layer and the
//! accessor can focus on reading and degrading gracefully.

use serde::Serialize;

/// Marker the store itself uses in front of citation keys.
pub const STORE_MARKER: char = '@';
/// Marker used by upstream documents in front of citation keys.
pub const DOCUMENT_MARKER: char = '#';
/// Separator between label and detail in a short title.
const SHORT_TITLE_DELIMITER: char = '–';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A person linked to a reference through `ReferenceAuthor`.
pub struct Author {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Read-only projection of one `Reference` row. Every field falls back to its
/// zero value so a reference with missing columns still produces an entry.
pub struct BibEntry {
    pub title: String,
    /// Publication year. `None` when the column is empty or not numeric.
    pub year: Option<i64>,
    /// Display string built by [`format_authors`].
    pub authors: String,
    /// Always empty: the store does not tell editors apart from authors.
    pub editors: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(rename = "shortTitle")]
    pub short_title: String,
}

/// Render the author list of a reference.
///
/// More than two authors collapse to `"<first name of the first author> et al."`;
/// otherwise the last names are joined with `" & "`. No authors yield `""`.
pub fn format_authors(authors: &[Author]) -> String {
    if authors.len() > 2 {
        format!("{} et al.", authors[0].first_name)
    } else {
        authors
            .iter()
            .map(|author| author.last_name.as_str())
            .collect::<Vec<_>>()
            .join(" & ")
    }
}

/// Combine short title and title into `"<label>– <title>"`.
///
/// Everything after the first en-dash of the short title is dropped. A short
/// title without an en-dash is used whole as the label.
pub fn format_bib(short_title: &str, title: &str) -> String {
    let label = short_title
        .split_once(SHORT_TITLE_DELIMITER)
        .map_or(short_title, |(label, _)| label);
    format!("{label}{SHORT_TITLE_DELIMITER} {title}")
}

/// Drop a single leading store marker (`@key` -> `key`).
pub fn strip_citekey_marker(citekey: &str) -> &str {
    citekey.strip_prefix(STORE_MARKER).unwrap_or(citekey)
}

/// Translate a document citation key into the store convention by swapping a
/// leading `#` for `@`. Keys without the document marker pass through.
pub fn to_store_citekey(citekey: &str) -> String {
    match citekey.strip_prefix(DOCUMENT_MARKER) {
        Some(rest) => format!("{STORE_MARKER}{rest}"),
        None => citekey.to_string(),
    }
}
