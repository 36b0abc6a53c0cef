//! # tienda-store
//!
//! Local-first persistence for the Tienda shopping client, backed by SQLite.
//!
//! The crate exposes a synchronous [`Database`] that wraps a
//! `rusqlite::Connection`, runs the versioned migration chain on open, and
//! provides typed CRUD helpers for products, cart lines, users and orders.
//! [`StoreHandle`] serialises access to one database for async callers, and
//! [`SessionStore`] keeps the logged-in user outside the relational schema.

pub mod cart;
pub mod database;
pub mod handle;
pub mod migrations;
pub mod models;
pub mod orders;
pub mod products;
pub mod seed;
pub mod session;
pub mod users;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use handle::{get_or_create_instance, instance, open_seeded, StoreHandle};
pub use models::*;
pub use session::SessionStore;
