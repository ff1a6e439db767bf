//! Cache store error types.

/// Errors that can occur when reading or writing the library cache.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite operation failed
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem operation failed (e.g. creating the database directory)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored freshness date could not be parsed
    #[error("invalid refresh date in cache: {value:?}")]
    InvalidDate { value: String },

    /// A previous holder of the connection panicked
    #[error("cache connection lock poisoned")]
    Poisoned,
}
