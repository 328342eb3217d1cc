//! Unit tests for dashboard statistics.
