//! Argon2id credential hasher.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::config::CredentialSettings;
use crate::user::{
    domain::CredentialHash,
    ports::{CredentialError, CredentialHasher},
};

/// Credential hasher producing Argon2id PHC strings.
#[derive(Debug, Clone)]
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Argon2CredentialHasher {
    /// Creates a hasher with the library's default Argon2id cost parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Creates a hasher from configured cost parameters.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Hash`] when the parameters are outside the
    /// ranges Argon2 accepts.
    pub fn from_settings(settings: &CredentialSettings) -> Result<Self, CredentialError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|err| CredentialError::Hash(format!("invalid parameters: {err}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<CredentialHash, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| CredentialError::Hash(err.to_string()))?;
        Ok(CredentialHash::from_encoded(hash.to_string()))
    }

    fn verify(&self, password: &str, hash: &CredentialHash) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(hash.as_str())
            .map_err(|err| CredentialError::InvalidHash(err.to_string()))?;
        // Cost parameters are read from the PHC string itself.
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(err) => Err(CredentialError::Verify(err.to_string())),
        }
    }
}
