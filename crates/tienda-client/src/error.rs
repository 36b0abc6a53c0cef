use thiserror::Error;
use tienda_net::GatewayError;
use tienda_store::StoreError;

/// Outcomes the UI layer has to handle.
///
/// Transport failures are normally absorbed by the sync coordinator; the
/// `Transport` variant only escapes from calls with no local fallback.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("local schema could not be migrated: {0}")]
    Migration(StoreError),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("remote unavailable: {0}")]
    Transport(#[from] GatewayError),

    #[error("local persistence failed: {0}")]
    Persistence(StoreError),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl From<StoreError> for ClientError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Migration { .. } => Self::Migration(e),
            StoreError::InvalidQuantity(_) => Self::Validation(e.to_string()),
            other => Self::Persistence(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
