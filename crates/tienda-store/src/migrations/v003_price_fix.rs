//! v003 -- One-time price correction for the launch catalog.
//!
//! Data-only: overwrites the price of products 1-4 by id.

use rusqlite::Connection;

const UP_SQL: &str = r#"
UPDATE products SET price = 49.99 WHERE id = 1;
UPDATE products SET price = 79.99 WHERE id = 2;
UPDATE products SET price = 39.99 WHERE id = 3;
UPDATE products SET price = 12.99 WHERE id = 4;
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
