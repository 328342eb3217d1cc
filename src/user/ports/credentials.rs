//! Credential hashing port.

use crate::user::domain::CredentialHash;
use thiserror::Error;

/// One-way password hashing contract.
///
/// Implementations are CPU-bound and synchronous; services call them from a
/// blocking task.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plaintext password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hash`] when hashing fails.
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialError>;

    /// Checks a plaintext password against a stored hash.
    ///
    /// Returns `Ok(false)` for a wrong password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::InvalidHash`] when the stored hash cannot be
    /// parsed, or [`CredentialError::Verify`] for other failures.
    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialError>;
}

/// Errors returned by credential hashers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// Hashing failed.
    #[error("failed to hash credential: {0}")]
    Hash(String),

    /// Verification failed for a reason other than a wrong password.
    #[error("failed to verify credential: {0}")]
    Verify(String),

    /// The stored hash is not a valid PHC string.
    #[error("invalid credential hash: {0}")]
    InvalidHash(String),

    /// The blocking hashing task could not complete.
    #[error("credential worker failed: {0}")]
    Worker(String),
}
