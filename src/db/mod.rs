//! SQLite storage: connection pools, schema migrations and per-table queries.

pub mod migrations;
pub mod pool;
pub mod queries;

pub use pool::{create_in_memory_pool, create_pool, DbPool};
