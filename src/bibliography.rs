//! Citation key lookups against a reference store.
//!
//! Each operation comes in two flavours. The `try_*` functions report why a
//! lookup produced nothing through [`LookupError`]. The plain functions log
//! that reason and hand back an empty default, so a missing reference never
//! aborts the processing of a whole document.
//!
//! Every call opens its own read-only connection and closes it before
//! returning.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use rusqlite::Connection;

use crate::db::{
    close_store, fetch_authors, fetch_citekeys, fetch_references, fetch_short_title, fetch_title,
    fetch_title_and_short_title, open_store,
};
use crate::error::LookupError;
use crate::finder::{CitationFinder, MarkerFinder};
use crate::models::{format_authors, format_bib, strip_citekey_marker, to_store_citekey, BibEntry};

/// Run `op` against a freshly opened store and close the connection
/// afterwards, whatever the outcome.
fn with_store<T>(
    store: &Path,
    op: impl FnOnce(&Connection) -> Result<T, LookupError>,
) -> Result<T, LookupError> {
    let conn = open_store(store)?;
    let result = op(&conn);
    close_store(conn);
    result
}

fn or_default<T: Default>(operation: &str, store: &Path, result: Result<T, LookupError>) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(operation, store = %store.display(), "{err}");
        T::default()
    })
}

/// Every reference keyed by citation key.
///
/// A reference whose author lookup fails keeps an empty author string; the
/// failure is logged and the remaining references are still returned.
pub fn try_list_all_entries(store: &Path) -> Result<BTreeMap<String, BibEntry>, LookupError> {
    with_store(store, |conn| {
        tracing::debug!(store = %store.display(), "reading references from store");
        let references = fetch_references(conn)?;

        let mut entries = BTreeMap::new();
        for reference in references {
            let authors = match fetch_authors(conn, &reference.citekey) {
                Ok(authors) => format_authors(&authors),
                Err(err) => {
                    tracing::warn!(citekey = %reference.citekey, "{err:#}");
                    String::new()
                }
            };

            entries.insert(
                reference.citekey,
                BibEntry {
                    title: reference.title,
                    year: reference.year,
                    authors,
                    editors: String::new(),
                    entry_type: reference.entry_type,
                    short_title: reference.short_title,
                },
            );
        }

        Ok(entries)
    })
}

/// Every reference keyed by citation key; empty when the store is unusable.
pub fn list_all_entries(store: &Path) -> BTreeMap<String, BibEntry> {
    or_default("list_all_entries", store, try_list_all_entries(store))
}

/// Every citation key known to the store.
pub fn try_list_all_citekeys(store: &Path) -> Result<BTreeSet<String>, LookupError> {
    with_store(store, |conn| {
        tracing::debug!(store = %store.display(), "reading citation keys from store");
        Ok(fetch_citekeys(conn)?.into_iter().collect())
    })
}

/// Every citation key known to the store; empty when the store is unusable.
pub fn list_all_citekeys(store: &Path) -> BTreeSet<String> {
    or_default("list_all_citekeys", store, try_list_all_citekeys(store))
}

/// Short title of `citekey`. A leading `@` is ignored.
pub fn try_get_short_title(store: &Path, citekey: &str) -> Result<String, LookupError> {
    let citekey = strip_citekey_marker(citekey);
    with_store(store, |conn| {
        fetch_short_title(conn, citekey)?
            .ok_or_else(|| LookupError::UnknownCitekey(citekey.to_string()))
    })
}

/// Short title of `citekey`, or `""` when it cannot be read.
pub fn get_short_title(store: &Path, citekey: &str) -> String {
    or_default("get_short_title", store, try_get_short_title(store, citekey))
}

/// Title of `citekey`. A leading `@` is ignored.
pub fn try_get_title(store: &Path, citekey: &str) -> Result<String, LookupError> {
    let citekey = strip_citekey_marker(citekey);
    with_store(store, |conn| {
        fetch_title(conn, citekey)?.ok_or_else(|| LookupError::UnknownCitekey(citekey.to_string()))
    })
}

/// Title of `citekey`, or `""` when it cannot be read.
pub fn get_title(store: &Path, citekey: &str) -> String {
    or_default("get_title", store, try_get_title(store, citekey))
}

fn formatted_bib(conn: &Connection, citekey: &str) -> Result<String, LookupError> {
    bib_for_store_key(conn, strip_citekey_marker(citekey))
}

/// Format the bib line of a key exactly as stored, without marker handling.
fn bib_for_store_key(conn: &Connection, citekey: &str) -> Result<String, LookupError> {
    let (title, short_title) = fetch_title_and_short_title(conn, citekey)?
        .ok_or_else(|| LookupError::UnknownCitekey(citekey.to_string()))?;
    Ok(format_bib(&short_title, &title))
}

/// `"<short title label>– <title>"` for `citekey`, see [`format_bib`].
pub fn try_get_formatted_bib(store: &Path, citekey: &str) -> Result<String, LookupError> {
    with_store(store, |conn| formatted_bib(conn, citekey))
}

/// Formatted bib line of `citekey`, or `""` when it cannot be read.
pub fn get_formatted_bib(store: &Path, citekey: &str) -> String {
    or_default("get_formatted_bib", store, try_get_formatted_bib(store, citekey))
}

/// Bibliography for every store key cited in `text`, using [`MarkerFinder`].
pub fn try_build_bibliography(
    text: &str,
    store: &Path,
) -> Result<BTreeMap<String, String>, LookupError> {
    try_build_bibliography_with(&MarkerFinder, text, store)
}

/// Bibliography for every store key `finder` reports in `text`.
///
/// Keys are mapped, as reported, to their formatted bib string. A key counts
/// when its unmarked form or the key itself is a store key. One connection
/// serves the whole batch. A key whose lookup fails is logged and maps to `""`.
pub fn try_build_bibliography_with(
    finder: &dyn CitationFinder,
    text: &str,
    store: &Path,
) -> Result<BTreeMap<String, String>, LookupError> {
    with_store(store, |conn| {
        let known: BTreeSet<String> = fetch_citekeys(conn)?.into_iter().collect();
        if known.is_empty() {
            return Ok(BTreeMap::new());
        }

        let mut bibliography = BTreeMap::new();
        for citekey in finder.find_citations(text, &known) {
            // Finders may hand back foreign keys; only the store's own count.
            let Some(store_key) = resolve_known_citekey(&citekey, &known) else {
                continue;
            };
            let bib = bib_for_store_key(conn, store_key).unwrap_or_else(|err| {
                tracing::warn!(citekey = %citekey, "{err}");
                String::new()
            });
            bibliography.insert(citekey, bib);
        }

        tracing::debug!(entries = bibliography.len(), "built bibliography");
        Ok(bibliography)
    })
}

/// Map a key reported by a finder onto a key of the store.
///
/// The marked forms `#key` and `@key` resolve to `key`. A key the store holds
/// verbatim (say `#tagged`) resolves to itself when its unmarked form is
/// unknown.
fn resolve_known_citekey<'a>(citekey: &str, known: &'a BTreeSet<String>) -> Option<&'a str> {
    let normalized = to_store_citekey(citekey);
    known
        .get(strip_citekey_marker(&normalized))
        .or_else(|| known.get(citekey))
        .map(String::as_str)
}

/// Bibliography for `text`; empty when the store is unusable.
pub fn build_bibliography(text: &str, store: &Path) -> BTreeMap<String, String> {
    or_default("build_bibliography", store, try_build_bibliography(text, store))
}

/// Same as [`build_bibliography`] with a caller supplied finder.
pub fn build_bibliography_with(
    finder: &dyn CitationFinder,
    text: &str,
    store: &Path,
) -> BTreeMap<String, String> {
    or_default(
        "build_bibliography",
        store,
        try_build_bibliography_with(finder, text, store),
    )
}
