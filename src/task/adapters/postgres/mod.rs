//! Diesel-backed task persistence over an r2d2 connection pool.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskRepository, TaskPgPool};
