//! CRUD operations for [`Product`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::Result;
use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, name, description, price, imageRes, imageUrl";

impl Database {
    // ------------------------------------------------------------------
    // Write
    // ------------------------------------------------------------------

    /// Insert or replace a single product by id.
    pub fn upsert_product(&self, product: &Product) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO products (id, name, description, price, imageRes, imageUrl)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                product.id,
                product.name,
                product.description,
                product.price,
                product.image_res,
                product.image_url,
            ],
        )?;
        Ok(())
    }

    /// Replace every given product by id in one transaction.  Rows not in
    /// `products` are left alone.
    pub fn upsert_products(&mut self, products: &[Product]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO products (id, name, description, price, imageRes, imageUrl)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for product in products {
                stmt.execute(params![
                    product.id,
                    product.name,
                    product.description,
                    product.price,
                    product.image_res,
                    product.image_url,
                ])?;
            }
        }
        tx.commit()?;
        Ok(products.len())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_product(&self, id: i64) -> Result<Option<Product>> {
        Ok(self
            .conn()
            .query_row(
                &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
                params![id],
                row_to_product,
            )
            .optional()?)
    }

    /// All products, ordered by name.
    pub fn list_products(&self) -> Result<Vec<Product>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name ASC"
        ))?;
        let rows = stmt.query_map([], row_to_product)?;

        let mut products = Vec::new();
        for row in rows {
            products.push(row?);
        }
        Ok(products)
    }

    /// Products whose name or description contains `query`, ordered by name.
    ///
    /// Matching folds Unicode case, so `TÉRMICA` finds `térmica`.
    pub fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        let needle = query.trim().to_lowercase();
        let mut products = self.list_products()?;
        if !needle.is_empty() {
            products.retain(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            });
        }
        Ok(products)
    }

    pub fn count_products(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?)
    }
}

/// Map a `rusqlite::Row` to a [`Product`].
fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        image_res: row.get(4)?,
        image_url: row.get(5)?,
    })
}
