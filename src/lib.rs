//! Bibliography lookups against a reference manager's SQLite store.
//!
//! The store is owned by the reference manager; this crate only reads it. It
//! maps citation keys to bibliographic data and builds the bibliography for
//! the keys a document cites.
pub mod bibliography;
pub mod db;
pub mod error;
pub mod finder;
pub mod models;

pub use bibliography::{
    build_bibliography, build_bibliography_with, get_formatted_bib, get_short_title, get_title,
    list_all_citekeys, list_all_entries, try_build_bibliography, try_build_bibliography_with,
    try_get_formatted_bib, try_get_short_title, try_get_title, try_list_all_citekeys,
    try_list_all_entries,
};
pub use error::LookupError;
pub use finder::{CitationFinder, MarkerFinder};

/// The two domain types callers receive.
pub use models::{Author, BibEntry};
