//! Adapter implementations for user persistence and credential hashing.

pub mod hashing;
pub mod memory;
pub mod postgres;
