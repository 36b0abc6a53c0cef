use thiserror::Error;

/// Failures while parsing a stored `iterations:saltB64:hashB64` credential.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Stored credential must have three colon-separated parts, found {0}")]
    MalformedFormat(usize),

    #[error("Invalid iteration count: {0}")]
    InvalidIterations(String),

    #[error("Invalid base64 in stored credential")]
    InvalidBase64,

    #[error("Stored credential has an empty salt or hash")]
    EmptyComponent,

    #[error("Stored hash is {0} bytes, longer than supported")]
    HashTooLong(usize),
}
