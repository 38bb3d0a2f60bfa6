//! `PostgreSQL` adapters for order lifecycle persistence.

mod migrations;
mod models;
mod repository;
mod schema;

pub use migrations::{MIGRATIONS, run_migrations};
pub use repository::{OrderPgPool, PostgresOrderRepository, build_pool};
