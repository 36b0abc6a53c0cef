// Types and primitives shared by the store, gateway and client crates.

pub mod constants;
pub mod error;
pub mod password;
pub mod types;

pub use error::PasswordError;
pub use types::SyncTier;
