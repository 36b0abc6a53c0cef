//! CRUD operations for [`User`] records.

use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{NewUser, User};

impl Database {
    /// Insert a user and return it with its assigned id.
    pub fn insert_user(&self, user: &NewUser) -> Result<User> {
        self.conn().execute(
            "INSERT INTO users (name, email, passwordHash) VALUES (?1, ?2, ?3)",
            params![user.name, user.email, user.password_hash],
        )?;

        Ok(User {
            id: self.conn().last_insert_rowid(),
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
        })
    }

    pub fn get_user(&self, id: i64) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, name, email, passwordHash FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// Exact, case-sensitive lookup.  The oldest row wins if an email was
    /// stored more than once.
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .conn()
            .query_row(
                "SELECT id, name, email, passwordHash
                 FROM users
                 WHERE email = ?1
                 ORDER BY id ASC
                 LIMIT 1",
                params![email],
                row_to_user,
            )
            .optional()?)
    }

    /// Overwrite name, email and hash of an existing user.
    pub fn update_user(&self, user: &User) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE users SET name = ?1, email = ?2, passwordHash = ?3 WHERE id = ?4",
            params![user.name, user.email, user.password_hash, user.id],
        )?;
        Ok(affected > 0)
    }

    pub fn count_users(&self) -> Result<i64> {
        Ok(self
            .conn()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
    })
}
