//! # Agora DB
//!
//! Database pool, migrations and the store error taxonomy for the Agora API.
//!
//! Stores translate every `sqlx::Error` into a [`StoreError`] exactly once.
//! Handlers only ever see [`StoreError`] or the [`AppError`](agora_core::AppError)
//! it converts into.
//!
//! # Example
//!
//! ```ignore
//! use agora_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&config).await?;
//! run_migrations(&pool, &config.migration_source).await?;
//! ```

pub mod error;

use std::path::Path;

use agora_config::AppConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use error::StoreError;
pub use sqlx::PgPool;

const MAX_CONNECTIONS: u32 = 10;

/// Connects to PostgreSQL using `database_url` from the configuration.
pub async fn init_db_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(&config.database_url)
        .await?;

    info!(max_connections = MAX_CONNECTIONS, "Database pool ready");
    Ok(pool)
}

/// Applies pending migrations found in `source`. Already applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool, source: &str) -> Result<(), MigrateError> {
    let migrator = Migrator::new(Path::new(source)).await?;
    migrator.run(pool).await?;

    info!(source, migrations = migrator.iter().count(), "Migrations applied");
    Ok(())
}
