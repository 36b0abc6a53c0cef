//! v001 -- Initial schema creation.
//!
//! Creates the three tables shipped with the first release: `products`,
//! `cart_items` and `users`.

use rusqlite::Connection;

/// SQL executed when creating a version 1 database.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Products (catalog cache, upserted by id)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    price       REAL NOT NULL
);

-- ----------------------------------------------------------------
-- Cart lines (productId is not a foreign key: dangling ids are tolerated)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS cart_items (
    id        INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    productId INTEGER NOT NULL,
    name      TEXT NOT NULL,
    price     REAL NOT NULL,               -- snapshot at add time
    quantity  INTEGER NOT NULL
);

-- ----------------------------------------------------------------
-- Local user accounts (offline login fallback)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name         TEXT NOT NULL,
    email        TEXT NOT NULL,
    passwordHash TEXT NOT NULL             -- iterations:saltB64:hashB64
);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
