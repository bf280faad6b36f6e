//! Credential hashing and verification.
//!
//! The session engine only ever sees the [`CredentialVerifier`] trait;
//! the concrete Argon2 implementation lives behind it so tests can swap
//! in a cheap verifier and the rest of the server never touches password
//! material directly.

use crate::error::AuthError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Hash a plaintext password into an opaque storable credential.
    async fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Check a plaintext password against a stored credential.
    /// A mismatch is `Ok(false)`, never an error.
    async fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError>;
}

pub type DynVerifier = Arc<dyn CredentialVerifier>;

/// Argon2id-backed verifier used by the real server.
#[derive(Default)]
pub struct ArgonVerifier;

#[async_trait]
impl CredentialVerifier for ArgonVerifier {
    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    async fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify_round_trip() {
        let v = ArgonVerifier;
        let stored = v.hash("hunter2").await.unwrap();
        assert!(v.verify("hunter2", &stored).await.unwrap());
        assert!(!v.verify("hunter3", &stored).await.unwrap());
    }

    #[tokio::test]
    async fn hashes_are_salted() {
        let v = ArgonVerifier;
        let a = v.hash("same-password").await.unwrap();
        let b = v.hash("same-password").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn garbage_credential_is_a_hashing_error() {
        let v = ArgonVerifier;
        assert!(v.verify("pw", "not-a-phc-string").await.is_err());
    }
}
