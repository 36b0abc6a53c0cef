//! v005 -- Order history tables.
//!
//! Order lines are a denormalised snapshot; they never reference `products`.

use rusqlite::Connection;

const UP_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id        INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    userId    INTEGER NOT NULL,
    total     REAL NOT NULL,
    createdAt INTEGER NOT NULL               -- epoch millis
);

CREATE TABLE IF NOT EXISTS order_items (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    orderId     INTEGER NOT NULL,
    productName TEXT NOT NULL,
    price       REAL NOT NULL,
    quantity    INTEGER NOT NULL
);
"#;

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
