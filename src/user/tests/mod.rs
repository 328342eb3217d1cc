//! Unit tests for the user lifecycle.

mod helpers;
