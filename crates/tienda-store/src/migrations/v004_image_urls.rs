//! v004 -- Remote image URLs for the launch catalog.

use rusqlite::{params, Connection};

/// Image URL written for each launch product id.
pub const IMAGE_URLS: [(i64, &str); 4] = [
    (
        1,
        "https://http2.mlstatic.com/D_NQ_NP_975534-MLC91531679389_092025-O-cafetera-moka-italiana-manual-generica-3-tazas-negra.webp",
    ),
    (2, "https://m.media-amazon.com/images/I/51Fl+3ERtDL._AC_SL1200_.jpg"),
    (3, "https://http2.mlstatic.com/D_NQ_NP_638962-MLC81893450089_012025-O.webp"),
    (4, "https://i.ebayimg.com/images/g/5AUAAOSwmCFjF58k/s-l1600.webp"),
];

pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    let mut stmt = conn.prepare("UPDATE products SET imageUrl = ?1 WHERE id = ?2")?;
    for (id, url) in IMAGE_URLS {
        stmt.execute(params![url, id])?;
    }
    Ok(())
}
