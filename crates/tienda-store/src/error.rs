use thiserror::Error;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (database directory, session file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A query expected exactly one row but found none.
    #[error("Record not found")]
    NotFound,

    /// A migration step failed; the schema stays at the last committed version.
    #[error("Migration to v{version} failed: {reason}")]
    Migration { version: u32, reason: String },

    /// Orders must carry at least one line.
    #[error("Refusing to persist an order without lines")]
    EmptyOrder,

    /// Cart lines exist only with a quantity of at least one.
    #[error("Invalid cart quantity: {0}")]
    InvalidQuantity(i64),

    /// Session file (de)serialisation failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The blocking task running a store call panicked or was cancelled.
    #[error("Store task failed: {0}")]
    Task(String),

    #[error("Database lock poisoned")]
    LockPoisoned,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
