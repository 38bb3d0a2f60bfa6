//! Bundled schema migrations for the `PostgreSQL` adapter.

use crate::order::ports::{OrderRepositoryError, OrderRepositoryResult};
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// SQL migrations shipped with the crate.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies every pending migration and returns how many ran.
///
/// # Errors
///
/// Returns [`OrderRepositoryError::Persistence`] when a migration fails.
pub fn run_migrations(connection: &mut PgConnection) -> OrderRepositoryResult<usize> {
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| OrderRepositoryError::persistence(std::io::Error::other(err.to_string())))?;
    info!(count = applied.len(), "applied pending order schema migrations");
    Ok(applied.len())
}
