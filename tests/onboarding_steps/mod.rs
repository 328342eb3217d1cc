//! Step definitions for onboarding scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
