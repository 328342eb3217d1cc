//! Port contracts for the user lifecycle.
//!
//! Ports define infrastructure-agnostic interfaces used by user services.

pub mod credentials;
pub mod repository;

pub use credentials::{CredentialError, CredentialHasher};
pub use repository::{UserQuery, UserRepository, UserRepositoryError, UserRepositoryResult};
