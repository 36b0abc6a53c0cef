//! CRUD operations for [`CartItem`] records.
//!
//! A line only exists with a quantity of at least one; callers that want a
//! line gone delete it instead of writing zero.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{CartItem, NewCartItem};

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new line and return it with its assigned id.
    pub fn insert_cart_item(&self, item: &NewCartItem) -> Result<CartItem> {
        ensure_quantity(item.quantity)?;
        self.conn().execute(
            "INSERT INTO cart_items (productId, name, price, quantity)
             VALUES (?1, ?2, ?3, ?4)",
            params![item.product_id, item.name, item.price, item.quantity],
        )?;

        Ok(CartItem {
            id: self.conn().last_insert_rowid(),
            product_id: item.product_id,
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        })
    }

    /// Re-insert a previously deleted line under its original id.
    pub fn restore_cart_item(&self, item: &CartItem) -> Result<()> {
        ensure_quantity(item.quantity)?;
        self.conn().execute(
            "INSERT INTO cart_items (id, productId, name, price, quantity)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![item.id, item.product_id, item.name, item.price, item.quantity],
        )?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// All lines in insertion order.
    pub fn list_cart_items(&self) -> Result<Vec<CartItem>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, productId, name, price, quantity
             FROM cart_items
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_cart_item)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    pub fn get_cart_item(&self, id: i64) -> Result<Option<CartItem>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, productId, name, price, quantity FROM cart_items WHERE id = ?1",
                params![id],
                row_to_cart_item,
            )
            .optional()?)
    }

    /// The first line for `product_id`, if any.
    pub fn get_cart_item_by_product(&self, product_id: i64) -> Result<Option<CartItem>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, productId, name, price, quantity
                 FROM cart_items
                 WHERE productId = ?1
                 ORDER BY id ASC
                 LIMIT 1",
                params![product_id],
                row_to_cart_item,
            )
            .optional()?)
    }

    /// Sum of price x quantity over every line.
    pub fn cart_total(&self) -> Result<f64> {
        Ok(self.conn().query_row(
            "SELECT COALESCE(SUM(price * quantity), 0.0) FROM cart_items",
            [],
            |row| row.get(0),
        )?)
    }

    // ------------------------------------------------------------------
    // Update / Delete
    // ------------------------------------------------------------------

    /// Set the quantity of a line.  Returns `true` if a row was updated.
    pub fn update_cart_quantity(&self, id: i64, quantity: i64) -> Result<bool> {
        ensure_quantity(quantity)?;
        let affected = self.conn().execute(
            "UPDATE cart_items SET quantity = ?1 WHERE id = ?2",
            params![quantity, id],
        )?;
        Ok(affected > 0)
    }

    /// Delete a line by id.  Returns `true` if a row was deleted.
    pub fn delete_cart_item(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM cart_items WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Delete every line, returning how many were removed.
    pub fn clear_cart(&self) -> Result<usize> {
        Ok(self.conn().execute("DELETE FROM cart_items", [])?)
    }

    /// Take the ordered `lines` out of the cart in one transaction.
    ///
    /// Each line is matched by id and loses only the ordered quantity, so
    /// lines added or units bumped after the snapshot stay.  Returns how many
    /// rows were deleted.
    pub fn settle_cart_lines(&mut self, lines: &[CartItem]) -> Result<usize> {
        let tx = self.conn_mut().transaction()?;
        let mut deleted = 0;
        for ordered in lines {
            let current: Option<i64> = tx
                .query_row(
                    "SELECT quantity FROM cart_items WHERE id = ?1",
                    params![ordered.id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(current) = current else { continue };

            let left = current.saturating_sub(ordered.quantity);
            if left >= 1 {
                tx.execute(
                    "UPDATE cart_items SET quantity = ?1 WHERE id = ?2",
                    params![left, ordered.id],
                )?;
            } else {
                deleted += tx.execute("DELETE FROM cart_items WHERE id = ?1", params![ordered.id])?;
            }
        }
        tx.commit()?;
        Ok(deleted)
    }
}

fn ensure_quantity(quantity: i64) -> Result<()> {
    if quantity < 1 {
        return Err(StoreError::InvalidQuantity(quantity));
    }
    Ok(())
}

fn row_to_cart_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<CartItem> {
    Ok(CartItem {
        id: row.get(0)?,
        product_id: row.get(1)?,
        name: row.get(2)?,
        price: row.get(3)?,
        quantity: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(product_id: i64, price: f64, quantity: i64) -> NewCartItem {
        NewCartItem {
            product_id,
            name: format!("Product {product_id}"),
            price,
            quantity,
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_cart_item(&new_item(1, 10.0, 1)).unwrap();
        let b = db.insert_cart_item(&new_item(2, 5.0, 1)).unwrap();
        assert!(b.id > a.id);
        assert_eq!(db.list_cart_items().unwrap(), vec![a, b]);
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.insert_cart_item(&new_item(1, 1.0, 0)),
            Err(StoreError::InvalidQuantity(0))
        ));

        let line = db.insert_cart_item(&new_item(1, 1.0, 1)).unwrap();
        assert!(db.update_cart_quantity(line.id, 0).is_err());
        assert_eq!(db.get_cart_item(line.id).unwrap().unwrap().quantity, 1);
    }

    #[test]
    fn restore_keeps_original_id() {
        let db = Database::open_in_memory().unwrap();
        let line = db.insert_cart_item(&new_item(1, 10.0, 3)).unwrap();
        db.delete_cart_item(line.id).unwrap();
        assert!(db.get_cart_item(line.id).unwrap().is_none());

        db.restore_cart_item(&line).unwrap();
        assert_eq!(db.get_cart_item(line.id).unwrap(), Some(line));
    }

    #[test]
    fn dangling_product_ids_are_tolerated() {
        let db = Database::open_in_memory().unwrap();
        let line = db.insert_cart_item(&new_item(999, 1.0, 1)).unwrap();
        assert_eq!(db.get_cart_item_by_product(999).unwrap(), Some(line));
    }

    #[test]
    fn total_and_clear() {
        let db = Database::open_in_memory().unwrap();
        db.insert_cart_item(&new_item(1, 10.0, 2)).unwrap();
        db.insert_cart_item(&new_item(2, 5.5, 1)).unwrap();
        assert_eq!(db.cart_total().unwrap(), 25.5);

        assert_eq!(db.clear_cart().unwrap(), 2);
        assert!(db.list_cart_items().unwrap().is_empty());
        assert_eq!(db.cart_total().unwrap(), 0.0);
    }

    #[test]
    fn settle_keeps_lines_outside_the_order() {
        let mut db = Database::open_in_memory().unwrap();
        let ordered = db.insert_cart_item(&new_item(1, 10.0, 2)).unwrap();
        let bumped = db.insert_cart_item(&new_item(2, 5.0, 1)).unwrap();
        db.update_cart_quantity(bumped.id, 3).unwrap();
        let late = db.insert_cart_item(&new_item(3, 7.0, 1)).unwrap();

        let snapshot = vec![ordered.clone(), bumped.clone()];
        assert_eq!(db.settle_cart_lines(&snapshot).unwrap(), 1);

        let left = db.list_cart_items().unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left[0].id, bumped.id);
        assert_eq!(left[0].quantity, 2);
        assert_eq!(left[1], late);
    }

    #[test]
    fn settle_ignores_lines_already_gone() {
        let mut db = Database::open_in_memory().unwrap();
        let line = db.insert_cart_item(&new_item(1, 10.0, 1)).unwrap();
        db.delete_cart_item(line.id).unwrap();

        assert_eq!(db.settle_cart_lines(&[line]).unwrap(), 0);
        assert!(db.list_cart_items().unwrap().is_empty());
    }
}
