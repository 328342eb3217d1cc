//! In-memory adapters for user lifecycle persistence.

mod user;

pub use user::InMemoryUserRepository;
