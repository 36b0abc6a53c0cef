//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! the schema has been migrated to the requested version before any other
//! operation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;

use crate::error::{Result, StoreError};
use crate::migrations::{self, Migration, CURRENT_VERSION, MIGRATIONS};

/// File name of the database inside the data directory.
pub const DB_FILE_NAME: &str = "tienda.db";

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/tienda/tienda.db`
    /// - macOS:   `~/Library/Application Support/com.tienda.tienda/tienda.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\tienda\tienda\data\tienda.db`
    pub fn new() -> Result<Self> {
        let db_path = default_data_dir()?.join(DB_FILE_NAME);

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path, migrated to the
    /// current schema version.
    pub fn open_at(path: &Path) -> Result<Self> {
        Self::open_with(path, CURRENT_VERSION, MIGRATIONS)
    }

    /// Open a database at `path` and bring it to `target` using `migrations`.
    ///
    /// A file that fails to migrate is closed; its recorded version is the
    /// last step that committed.
    pub fn open_with(path: &Path, target: u32, migrations: &[Migration]) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Self::from_connection(conn, target, migrations)
    }

    /// A throwaway database at the current schema version.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, CURRENT_VERSION, MIGRATIONS)
    }

    fn from_connection(mut conn: Connection, target: u32, migrations: &[Migration]) -> Result<Self> {
        migrations::run_migrations(&mut conn, target, migrations)?;
        Ok(Self { conn })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed CRUD helpers, but direct access is
    /// occasionally needed for ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Return a mutable reference to the underlying connection.
    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn
            .path()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
    }

    /// The schema version currently recorded in the file.
    pub fn schema_version(&self) -> Result<u32> {
        migrations::schema_version(&self.conn)
    }
}

/// Platform data directory for the application, created if missing.
pub fn default_data_dir() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("com", "tienda", "tienda").ok_or(StoreError::NoDataDir)?;

    let data_dir = project_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.to_path_buf())
}
