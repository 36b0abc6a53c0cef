//! One-way credential storage.
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a fresh 16-byte salt, stored as
//! `iterations:saltBase64:hashBase64`. Verification re-derives a key of the
//! stored hash's length with the stored salt and iteration count and compares
//! in constant time.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::constants::{
    PASSWORD_ITERATIONS, PASSWORD_KEY_LEN, PASSWORD_MAX_ITERATIONS, PASSWORD_MAX_KEY_LEN,
    PASSWORD_SALT_LEN,
};
use crate::error::PasswordError;

/// A parsed `iterations:salt:hash` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub iterations: u32,
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

impl StoredCredential {
    pub fn parse(stored: &str) -> Result<Self, PasswordError> {
        let parts: Vec<&str> = stored.split(':').collect();
        if parts.len() != 3 {
            return Err(PasswordError::MalformedFormat(parts.len()));
        }

        let iterations: u32 = parts[0]
            .parse()
            .map_err(|_| PasswordError::InvalidIterations(parts[0].to_string()))?;
        if iterations == 0 || iterations > PASSWORD_MAX_ITERATIONS {
            return Err(PasswordError::InvalidIterations(parts[0].to_string()));
        }

        let salt = STANDARD
            .decode(parts[1])
            .map_err(|_| PasswordError::InvalidBase64)?;
        let hash = STANDARD
            .decode(parts[2])
            .map_err(|_| PasswordError::InvalidBase64)?;
        if salt.is_empty() || hash.is_empty() {
            return Err(PasswordError::EmptyComponent);
        }
        if hash.len() > PASSWORD_MAX_KEY_LEN {
            return Err(PasswordError::HashTooLong(hash.len()));
        }

        Ok(Self {
            iterations,
            salt,
            hash,
        })
    }

    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}",
            self.iterations,
            STANDARD.encode(&self.salt),
            STANDARD.encode(&self.hash)
        )
    }
}

/// Hash a password with the default iteration count.
pub fn hash_password(password: &str) -> String {
    hash_password_with_iterations(password, PASSWORD_ITERATIONS)
}

/// Hash a password with an explicit iteration count.
///
/// The count is recorded in the output, so [`verify_password`] works for any
/// value produced here.
pub fn hash_password_with_iterations(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; PASSWORD_SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let mut key = [0u8; PASSWORD_KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations.max(1), &mut key);

    StoredCredential {
        iterations: iterations.max(1),
        salt: salt.to_vec(),
        hash: key.to_vec(),
    }
    .encode()
}

/// Check `password` against a stored credential. Any parse failure is `false`.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(credential) = StoredCredential::parse(stored) else {
        return false;
    };

    let mut candidate = vec![0u8; credential.hash.len()];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        &credential.salt,
        credential.iterations,
        &mut candidate,
    );

    candidate[..].ct_eq(&credential.hash[..]).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keeps the test suite fast; the format is identical.
    const TEST_ITERATIONS: u32 = 1_000;

    #[test]
    fn test_hash_verify_roundtrip() {
        let stored = hash_password_with_iterations("demo123", TEST_ITERATIONS);
        assert!(verify_password("demo123", &stored));
    }

    #[test]
    fn test_wrong_password_fails() {
        let stored = hash_password_with_iterations("demo123", TEST_ITERATIONS);
        assert!(!verify_password("demo124", &stored));
        assert!(!verify_password("", &stored));
        assert!(!verify_password("DEMO123", &stored));
    }

    #[test]
    fn test_default_hash_format() {
        let stored = hash_password("s3cret");
        let parts: Vec<&str> = stored.split(':').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "65536");

        let credential = StoredCredential::parse(&stored).unwrap();
        assert_eq!(credential.salt.len(), PASSWORD_SALT_LEN);
        assert_eq!(credential.hash.len(), PASSWORD_KEY_LEN);
        assert!(verify_password("s3cret", &stored));
    }

    #[test]
    fn test_salts_are_unique() {
        let a = hash_password_with_iterations("same", TEST_ITERATIONS);
        let b = hash_password_with_iterations("same", TEST_ITERATIONS);
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_malformed_stored_values_fail_closed() {
        for stored in [
            "",
            "plaintext",
            "1000:abc",
            "1000:a:b:c",
            "notanumber:AAAA:AAAA",
            "0:AAAA:AAAA",
            "1000:!!!:AAAA",
            "1000::AAAA",
        ] {
            assert!(!verify_password("anything", stored), "accepted {stored:?}");
        }
    }

    #[test]
    fn test_other_hash_lengths_verify() {
        let salt = b"0123456789abcdef".to_vec();
        let mut key = vec![0u8; 20];
        pbkdf2_hmac::<Sha256>(b"pw", &salt, TEST_ITERATIONS, &mut key);
        let stored = StoredCredential {
            iterations: TEST_ITERATIONS,
            salt,
            hash: key,
        }
        .encode();

        assert!(verify_password("pw", &stored));
        assert!(!verify_password("pv", &stored));
    }

    #[test]
    fn test_excessive_cost_is_rejected() {
        let stored = format!("{}:AAAA:AAAA", PASSWORD_MAX_ITERATIONS + 1);
        assert!(matches!(
            StoredCredential::parse(&stored),
            Err(PasswordError::InvalidIterations(_))
        ));
        assert!(!verify_password("anything", &stored));

        let long = StoredCredential {
            iterations: 1,
            salt: vec![1; 16],
            hash: vec![0; PASSWORD_MAX_KEY_LEN + 1],
        };
        assert_eq!(
            StoredCredential::parse(&long.encode()),
            Err(PasswordError::HashTooLong(PASSWORD_MAX_KEY_LEN + 1))
        );
    }

    #[test]
    fn test_parse_reports_part_count() {
        assert_eq!(
            StoredCredential::parse("a:b"),
            Err(PasswordError::MalformedFormat(2))
        );
    }
}
