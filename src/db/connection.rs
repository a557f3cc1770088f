use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::BaseDirs;
use rusqlite::{Connection, OpenFlags};

use crate::error::LookupError;

/// Open the reference store read-only. The store is owned by the reference
/// manager, so we never create the file or touch its schema.
pub fn open_store(path: &Path) -> Result<Connection, LookupError> {
    if !path.exists() {
        return Err(LookupError::StoreNotFound(path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .with_context(|| format!("failed to open store {}", path.display()))?;

    Ok(conn)
}

/// Release a connection, logging instead of failing when SQLite refuses to
/// close it (the handle is dropped either way).
pub fn close_store(conn: Connection) {
    if let Err((_, err)) = conn.close() {
        tracing::debug!(error = %err, "failed to close store connection");
    }
}

/// Expand a leading `~` to the user's home directory. Paths without the tilde,
/// or environments without a home directory, are returned unchanged.
pub fn resolve_store_path(raw: &Path) -> PathBuf {
    let Ok(rest) = raw.strip_prefix("~") else {
        return raw.to_path_buf();
    };

    match BaseDirs::new() {
        Some(base_dirs) => base_dirs.home_dir().join(rest),
        None => raw.to_path_buf(),
    }
}
