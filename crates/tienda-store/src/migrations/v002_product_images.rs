//! v002 -- Product image columns.
//!
//! `imageRes` is a bundled-resource handle (0 = none) and `imageUrl` a remote
//! image. Each column is only added when missing so the step can be replayed.

use rusqlite::Connection;

use super::column_exists;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    if !column_exists(conn, "products", "imageRes")? {
        conn.execute_batch("ALTER TABLE products ADD COLUMN imageRes INTEGER NOT NULL DEFAULT 0;")?;
    }
    if !column_exists(conn, "products", "imageUrl")? {
        conn.execute_batch("ALTER TABLE products ADD COLUMN imageUrl TEXT;")?;
    }
    Ok(())
}
