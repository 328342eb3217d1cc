//! Blob storage for uploaded files.
//!
//! Task attachments, task responses, and student application documents are
//! stored outside the entity records. Records keep only a
//! [`domain::FileAttachment`] that names the stored blob. The module follows
//! the same hexagonal layout as the entity modules:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Staging helpers used by the lifecycle services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
