use serde::{Deserialize, Serialize};

/// Which tier satisfied a write: the remote service or the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncTier {
    Remote,
    Local,
}

impl std::fmt::Display for SyncTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote => write!(f, "server"),
            Self::Local => write!(f, "local"),
        }
    }
}
