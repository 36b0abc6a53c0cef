//! The persisted "who is logged in" value.
//!
//! Kept in a small JSON file next to the database rather than in the
//! relational schema, so it survives schema rebuilds and is cheap to read at
//! startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tienda_shared::constants::{NO_SESSION_USER_ID, SESSION_KEY_CURRENT_USER};

use crate::error::Result;

/// File name of the session file inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default = "no_session")]
    current_user_id: i64,
}

fn no_session() -> i64 {
    NO_SESSION_USER_ID
}

/// Reads and writes the current user id.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Session file inside `dir`.
    pub fn open(dir: &Path) -> Self {
        Self::at(dir.join(SESSION_FILE_NAME))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The logged-in user, or `None` when the file is missing or holds the
    /// sentinel.
    pub fn current_user_id(&self) -> Result<Option<i64>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: SessionFile = serde_json::from_str(&raw)?;
        Ok((file.current_user_id != NO_SESSION_USER_ID).then_some(file.current_user_id))
    }

    pub fn set_current_user_id(&self, user_id: i64) -> Result<()> {
        self.write(user_id)?;
        tracing::debug!(key = SESSION_KEY_CURRENT_USER, user_id, "session stored");
        Ok(())
    }

    /// Forget the logged-in user.
    pub fn clear(&self) -> Result<()> {
        self.write(NO_SESSION_USER_ID)?;
        tracing::debug!(key = SESSION_KEY_CURRENT_USER, "session cleared");
        Ok(())
    }

    // Write to a sibling temp file, then rename over the target.
    fn write(&self, user_id: i64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string(&SessionFile {
            current_user_id: user_id,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
