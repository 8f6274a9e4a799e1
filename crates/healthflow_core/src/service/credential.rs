//! Password credential hashing.
//!
//! Stored format is an Argon2id PHC string (`$argon2id$v=19$...`) with a
//! random per-credential salt. Values that do not parse as a PHC string are
//! legacy plaintext and compare by exact equality.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub struct CredentialError(argon2::password_hash::Error);

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "credential hashing failed: {}", self.0)
    }
}

impl Error for CredentialError {}

impl From<argon2::password_hash::Error> for CredentialError {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self(value)
    }
}

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Checks `candidate` against a stored credential of either format.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => candidate == stored,
    }
}

pub fn is_hashed(stored: &str) -> bool {
    PasswordHash::new(stored).is_ok()
}

#[cfg(test)]
mod tests {
    use super::{hash_password, is_hashed, verify_password};
    use argon2::password_hash::PasswordHash;

    #[test]
    fn hashed_credentials_verify_only_the_original_password() {
        let stored = hash_password("abcdef").unwrap();
        assert!(is_hashed(&stored));
        assert!(!stored.contains("abcdef"));
        assert!(verify_password("abcdef", &stored));
        assert!(!verify_password("abcdeg", &stored));
    }

    #[test]
    fn stored_credential_is_argon2id_with_work_factor() {
        let stored = hash_password("abcdef").unwrap();
        let parsed = PasswordHash::new(&stored).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        let memory_kib = parsed.params.get_decimal("m").unwrap();
        let iterations = parsed.params.get_decimal("t").unwrap();
        assert!(memory_kib >= 19 * 1024, "m={memory_kib}");
        assert!(iterations >= 2, "t={iterations}");
    }

    #[test]
    fn same_password_hashes_differently_each_time() {
        assert_ne!(
            hash_password("abcdef").unwrap(),
            hash_password("abcdef").unwrap()
        );
    }

    #[test]
    fn legacy_plaintext_uses_exact_equality() {
        assert!(!is_hashed("secret1"));
        assert!(verify_password("secret1", "secret1"));
        assert!(!verify_password("Secret1", "secret1"));
    }
}
