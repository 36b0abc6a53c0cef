//! Client configuration loaded from environment variables.
//!
//! Every setting has a default, so the client starts with no configuration
//! against the emulator loopback backend.

use std::path::PathBuf;
use std::time::Duration;

use tienda_shared::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_EXTERNAL_CATALOG_LIMIT, DEFAULT_EXTERNAL_CATALOG_URL,
    DEFAULT_HTTP_TIMEOUT_SECS,
};
use tienda_store::database::{default_data_dir, DB_FILE_NAME};
use tienda_store::session::SESSION_FILE_NAME;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL.
    /// Env: `TIENDA_API_BASE_URL`
    pub api_base_url: String,

    /// Third-party catalog base URL.
    /// Env: `TIENDA_EXTERNAL_CATALOG_URL`
    pub external_catalog_url: String,

    /// Directory holding the database and session files.
    /// Env: `TIENDA_DATA_DIR`
    /// Default: the platform data directory.
    pub data_dir: Option<PathBuf>,

    /// Per-request HTTP timeout.
    /// Env: `TIENDA_HTTP_TIMEOUT_SECS`
    pub http_timeout: Duration,

    /// How many third-party products to mix into the catalog.
    /// Env: `TIENDA_EXTERNAL_CATALOG_LIMIT`
    pub external_catalog_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            external_catalog_url: DEFAULT_EXTERNAL_CATALOG_URL.to_string(),
            data_dir: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            external_catalog_limit: DEFAULT_EXTERNAL_CATALOG_LIMIT,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("TIENDA_API_BASE_URL") {
            config.api_base_url = url;
        }

        if let Some(url) = lookup("TIENDA_EXTERNAL_CATALOG_URL") {
            config.external_catalog_url = url;
        }

        if let Some(dir) = lookup("TIENDA_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(secs) = lookup("TIENDA_HTTP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(parsed) if parsed > 0 => config.http_timeout = Duration::from_secs(parsed),
                _ => {
                    tracing::warn!(value = %secs, "Invalid TIENDA_HTTP_TIMEOUT_SECS, using default");
                }
            }
        }

        if let Some(limit) = lookup("TIENDA_EXTERNAL_CATALOG_LIMIT") {
            if let Ok(parsed) = limit.parse::<usize>() {
                config.external_catalog_limit = parsed;
            } else {
                tracing::warn!(
                    value = %limit,
                    "Invalid TIENDA_EXTERNAL_CATALOG_LIMIT, using default"
                );
            }
        }

        config
    }

    /// The configured data directory, or the platform default.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(default_data_dir()?),
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        Ok(self.resolve_data_dir()?.join(DB_FILE_NAME))
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        Ok(self.resolve_data_dir()?.join(SESSION_FILE_NAME))
    }
}
