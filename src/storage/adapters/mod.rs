//! Blob store adapters.

pub mod filesystem;
pub mod memory;
