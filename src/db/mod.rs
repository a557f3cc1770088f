//! Read-only queries against the reference manager's SQLite store.

mod connection;
mod references;

pub use connection::{close_store, open_store, resolve_store_path};
pub use references::{
    fetch_authors, fetch_citekeys, fetch_references, fetch_short_title, fetch_title,
    fetch_title_and_short_title, ReferenceRow,
};
