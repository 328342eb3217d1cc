//! Cohort: onboarding and task tracking for supervised students.
//!
//! Students apply with their application documents, administrators review
//! the applications, accepted students submit completion documents, and
//! each ready student is assigned to a supervisor. Supervisors then set
//! tasks that students respond to and complete, and supervisors grade.
//!
//! # Architecture
//!
//! Cohort follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, filesystem)
//!
//! # Modules
//!
//! - [`user`]: Application lifecycle, accounts, and supervisor assignment
//! - [`task`]: Task creation, responses, and grading
//! - [`storage`]: Blob storage for uploaded documents
//! - [`dashboard`]: Aggregate statistics
//! - [`locks`]: Per-entity write serialisation
//! - [`config`]: Settings loading
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod dashboard;
pub mod locks;
pub mod storage;
pub mod task;
pub mod telemetry;
pub mod user;
