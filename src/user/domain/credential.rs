//! Stored password credential.

use std::fmt;

/// One-way password hash in PHC string format.
///
/// The plaintext never reaches the domain; only a
/// [`crate::user::ports::CredentialHasher`] produces values of this type.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    /// Wraps an encoded hash produced by a credential hasher or read from
    /// storage.
    #[must_use]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Returns the encoded hash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}
