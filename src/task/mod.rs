//! Task lifecycle management.
//!
//! Supervisors set tasks for their students with a priority, a due date,
//! and an optional brief. Students respond, which moves a pending task into
//! progress, and eventually complete it; supervisors grade the result. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
