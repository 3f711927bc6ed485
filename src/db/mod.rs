//! Database module
//!
//! This module handles database connections, migrations, and repositories.

pub mod connection;
pub mod repositories;
pub mod score_store;

use sqlx::PgPool;

pub use connection::*;
pub use score_store::PgScoreStore;

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
