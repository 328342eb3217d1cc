//! Read-only statistics for the student, supervisor, and admin dashboards.
//!
//! Every figure is an independent count over the user and task
//! repositories, recomputed per call. Figures within one snapshot are not
//! guaranteed to be mutually consistent under concurrent writes.

mod service;
mod stats;

pub use service::{DashboardError, DashboardResult, DashboardService};
pub use stats::{AdminStats, StudentStats, SupervisorStats};

#[cfg(test)]
mod tests;
