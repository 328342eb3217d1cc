//! User lifecycle and supervisor assignment.
//!
//! Students apply, admins approve or reject the application, approved
//! applicants submit their completion documents, and admins finally assign
//! each ready student to a supervisor. Supervisors and admins are created
//! directly in the approved state. The module follows hexagonal
//! architecture:
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
