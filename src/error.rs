use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline errors. Per-value coercion failures are not errors; they
/// become missing markers and are resolved by the sanitizer's drop rules.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("source not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("store write failed: {0}")]
    StoreWrite(#[source] rusqlite::Error),

    #[error("store query failed: {0}")]
    StoreQuery(#[source] rusqlite::Error),

    #[error("invalid table name: {0:?}")]
    InvalidTableName(String),
}
