//! `SQLite` persistence for the feature store and the prediction log.

use core::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

mod employee;
mod prediction_log;
mod stats;

pub use employee::*;
pub use prediction_log::*;
pub use stats::*;

/// Creates a connection pool to the `SQLite` database, creating the file if needed.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the connection fails.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Creates a pool over a private in-memory database.
///
/// Every connection to `sqlite::memory:` opens a separate database, so the pool
/// is pinned to a single connection that never expires.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Runs all pending migrations.
///
/// # Errors
///
/// Returns an error if running migrations fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Checks that the database answers a trivial query.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
