//! Credential hashing as an explicit construction step.
//!
//! Hashing happens before a [`crate::domain::UserAccount`] is handed to the
//! store, never as a side effect of saving. The stored form is an argon2id
//! PHC string, so parameters travel with the hash and can be upgraded without
//! a migration.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;

/// Errors raised while deriving or parsing a credential hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialHashError {
    /// The hashing primitive failed; carries the underlying message.
    #[error("credential hashing failed: {message}")]
    Derivation { message: String },
    /// A stored value was not a parseable PHC string.
    #[error("stored credential hash is malformed: {message}")]
    Malformed { message: String },
}

/// Argon2id hash of a user's password in PHC string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Derive a hash from a raw password with a fresh random salt.
    pub fn derive(password: &str) -> Result<Self, CredentialHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialHashError::Derivation {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Reconstruct a hash from its stored string form, validating the format.
    pub fn from_stored(stored: impl Into<String>) -> Result<Self, CredentialHashError> {
        let stored = stored.into();
        PasswordHash::new(&stored).map_err(|err| CredentialHashError::Malformed {
            message: err.to_string(),
        })?;
        Ok(Self(stored))
    }

    /// Check a candidate password against this hash.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// The PHC string persisted in the user store.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
