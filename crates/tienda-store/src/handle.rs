//! Shared, serialised access to one [`Database`] from async code.
//!
//! SQLite work is blocking, so each call runs on tokio's blocking pool while
//! holding the handle's mutex.  Callers never see the connection outside a
//! closure.

use std::path::Path;
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::seed;

static INSTANCE: OnceCell<StoreHandle> = OnceCell::new();

/// Cloneable handle to a mutex-guarded database.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<Database>>,
}

impl StoreHandle {
    pub fn new(db: Database) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
        }
    }

    /// Run `f` against the database on the blocking pool.
    pub async fn call<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Database) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut guard = inner.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }

    /// Run `f` on the current thread.  For setup code outside a runtime.
    pub fn call_blocking<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Database) -> Result<R>,
    {
        let mut guard = self.inner.lock().map_err(|_| StoreError::LockPoisoned)?;
        f(&mut guard)
    }

    /// Whether two handles share the same database.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").finish_non_exhaustive()
    }
}

/// Open, migrate and seed a database at `path`.
pub fn open_seeded(path: &Path) -> Result<StoreHandle> {
    let mut db = Database::open_at(path)?;
    seed::seed_if_empty(&mut db);
    Ok(StoreHandle::new(db))
}

/// The process-wide database.
///
/// The first successful call opens `path`; later calls return the same
/// handle and ignore their argument.  A failed open is not cached.
pub fn get_or_create_instance(path: &Path) -> Result<StoreHandle> {
    INSTANCE
        .get_or_try_init(|| {
            tracing::info!(path = %path.display(), "initialising shared database");
            open_seeded(path)
        })
        .cloned()
}

/// The process-wide database, if it has been created.
pub fn instance() -> Option<StoreHandle> {
    INSTANCE.get().cloned()
}
