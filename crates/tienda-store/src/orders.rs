//! CRUD operations for [`Order`] and [`OrderItem`] records.
//!
//! Orders are written once, header and lines in one transaction, and never
//! updated afterwards.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{NewOrder, Order, OrderItem};

impl Database {
    /// Persist an order header with all of its lines atomically.
    pub fn create_order(&mut self, order: &NewOrder) -> Result<Order> {
        if order.items.is_empty() {
            return Err(StoreError::EmptyOrder);
        }

        let tx = self.conn_mut().transaction()?;
        tx.execute(
            "INSERT INTO orders (userId, total, createdAt) VALUES (?1, ?2, ?3)",
            params![order.user_id, order.total, order.created_at],
        )?;
        let order_id = tx.last_insert_rowid();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO order_items (orderId, productName, price, quantity)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for item in &order.items {
                stmt.execute(params![order_id, item.product_name, item.price, item.quantity])?;
            }
        }
        tx.commit()?;

        tracing::debug!(order_id, lines = order.items.len(), "order persisted");

        Ok(Order {
            id: order_id,
            user_id: order.user_id,
            total: order.total,
            created_at: order.created_at,
        })
    }

    pub fn get_order(&self, id: i64) -> Result<Option<Order>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, userId, total, createdAt FROM orders WHERE id = ?1",
                params![id],
                row_to_order,
            )
            .optional()?)
    }

    /// Orders placed by `user_id`, newest first.
    pub fn list_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, userId, total, createdAt
             FROM orders
             WHERE userId = ?1
             ORDER BY createdAt DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_order)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    pub fn get_order_items(&self, order_id: i64) -> Result<Vec<OrderItem>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, orderId, productName, price, quantity
             FROM order_items
             WHERE orderId = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![order_id], |row| {
            Ok(OrderItem {
                id: row.get(0)?,
                order_id: row.get(1)?,
                product_name: row.get(2)?,
                price: row.get(3)?,
                quantity: row.get(4)?,
            })
        })?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    pub fn count_orders(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?)
    }
}

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    Ok(Order {
        id: row.get(0)?,
        user_id: row.get(1)?,
        total: row.get(2)?,
        created_at: row.get(3)?,
    })
}
