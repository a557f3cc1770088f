use std::path::PathBuf;

/// Why a lookup against the reference store produced no data.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The store file does not exist.
    #[error("bibliography store not found: {}", .0.display())]
    StoreNotFound(PathBuf),

    /// The store was readable but holds no reference with this key.
    #[error("citation key not found in store: {0}")]
    UnknownCitekey(String),

    /// Opening the store, running a query or reading a row failed.
    #[error("unable to read references from store: {0:#}")]
    Query(anyhow::Error),
}

impl From<anyhow::Error> for LookupError {
    fn from(err: anyhow::Error) -> Self {
        LookupError::Query(err)
    }
}
