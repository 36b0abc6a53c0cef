//! Database migration runner.
//!
//! The schema version lives in the `user_version` pragma. A brand-new file is
//! created at the target version in a single transaction; an existing file is
//! walked forward one step at a time, each step committed together with its
//! version bump so a failure leaves the last completed version recorded.

pub mod v001_initial;
pub mod v002_product_images;
pub mod v003_price_fix;
pub mod v004_image_urls;
pub mod v005_orders;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::{Result, StoreError};

/// Version produced by [`v001_initial`].
pub const BASE_VERSION: u32 = 1;

/// Current schema version.  Bump this and append to [`MIGRATIONS`] whenever
/// the schema changes.
pub const CURRENT_VERSION: u32 = 5;

/// One forward step of the schema.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub from: u32,
    pub to: u32,
    pub name: &'static str,
    pub up: fn(&Connection) -> std::result::Result<(), rusqlite::Error>,
}

/// The shipped migration chain, ascending and gap-free.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        from: 1,
        to: 2,
        name: "v002_product_images",
        up: v002_product_images::up,
    },
    Migration {
        from: 2,
        to: 3,
        name: "v003_price_fix",
        up: v003_price_fix::up,
    },
    Migration {
        from: 3,
        to: 4,
        name: "v004_image_urls",
        up: v004_image_urls::up,
    },
    Migration {
        from: 4,
        to: 5,
        name: "v005_orders",
        up: v005_orders::up,
    },
];

/// Read the stored schema version (0 for a file that was never versioned).
pub fn schema_version(conn: &Connection) -> Result<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Bring `conn` to `target`, returning the version it ends at.
pub fn run_migrations(conn: &mut Connection, target: u32, migrations: &[Migration]) -> Result<u32> {
    validate_chain(migrations)?;
    if target < BASE_VERSION {
        return Err(StoreError::Migration {
            version: target,
            reason: format!("target must be at least v{BASE_VERSION}"),
        });
    }

    let current = schema_version(conn)?;

    info!(
        current_version = current,
        target_version = target,
        "checking database migrations"
    );

    if current == 0 {
        if has_user_tables(conn)? {
            return Err(StoreError::Migration {
                version: 0,
                reason: "existing tables without a recorded schema version".into(),
            });
        }
        create_fresh(conn, target, migrations)?;
        info!(version = target, "created fresh schema");
        return Ok(target);
    }

    if current > target {
        return Err(StoreError::Migration {
            version: current,
            reason: format!("database is at v{current}, newer than supported v{target}"),
        });
    }

    for step in plan(current, target, migrations)? {
        apply_migration(conn, step)?;
    }

    schema_version(conn)
}

/// Apply a single step in its own transaction.
///
/// Returns `false` without touching the database when it is already at or
/// above `step.to`.
pub fn apply_migration(conn: &mut Connection, step: &Migration) -> Result<bool> {
    let current = schema_version(conn)?;
    if current >= step.to {
        debug!(name = step.name, current_version = current, "migration already applied");
        return Ok(false);
    }
    if current != step.from {
        return Err(StoreError::Migration {
            version: step.to,
            reason: format!("database is at v{current}, step expects v{}", step.from),
        });
    }

    info!(name = step.name, from = step.from, to = step.to, "applying migration");

    let tx = conn.transaction()?;
    (step.up)(&tx).map_err(|e| StoreError::Migration {
        version: step.to,
        reason: e.to_string(),
    })?;
    tx.pragma_update(None, "user_version", step.to)?;
    tx.commit()?;

    Ok(true)
}

fn create_fresh(conn: &mut Connection, target: u32, migrations: &[Migration]) -> Result<()> {
    let steps = plan(BASE_VERSION, target, migrations)?;

    let tx = conn.transaction()?;
    v001_initial::up(&tx).map_err(|e| StoreError::Migration {
        version: BASE_VERSION,
        reason: e.to_string(),
    })?;
    for step in steps {
        (step.up)(&tx).map_err(|e| StoreError::Migration {
            version: step.to,
            reason: e.to_string(),
        })?;
    }
    tx.pragma_update(None, "user_version", target)?;
    tx.commit()?;

    Ok(())
}

// Resolved before anything is applied so a missing step never leaves a
// half-walked chain behind.
fn plan(current: u32, target: u32, migrations: &[Migration]) -> Result<Vec<&Migration>> {
    let mut steps = Vec::new();
    let mut version = current;
    while version < target {
        let step = migrations
            .iter()
            .find(|m| m.from == version)
            .ok_or_else(|| StoreError::Migration {
                version: version + 1,
                reason: format!("no migration from v{version}"),
            })?;
        steps.push(step);
        version = step.to;
    }
    Ok(steps)
}

fn validate_chain(migrations: &[Migration]) -> Result<()> {
    for m in migrations {
        if m.to != m.from + 1 {
            return Err(StoreError::Migration {
                version: m.to,
                reason: format!("{} must advance exactly one version", m.name),
            });
        }
    }
    for pair in migrations.windows(2) {
        if pair[1].from != pair[0].to {
            return Err(StoreError::Migration {
                version: pair[1].to,
                reason: format!("{} does not follow {}", pair[1].name, pair[0].name),
            });
        }
    }
    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub(crate) fn column_exists(
    conn: &Connection,
    table: &str,
    column: &str,
) -> std::result::Result<bool, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
