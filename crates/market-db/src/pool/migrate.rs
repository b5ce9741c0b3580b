//! Schema migrations
//!
//! SQL files live in `crates/market-db/migrations` and are loaded at runtime,
//! so no database is needed at compile time.

use std::path::PathBuf;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Override for deployments that ship the SQL files elsewhere
pub const MIGRATIONS_DIR_ENV: &str = "DATABASE_MIGRATIONS_DIR";

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Failed to load migrations from {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: MigrateError,
    },

    #[error("Migration failed: {0}")]
    Run(#[from] MigrateError),
}

fn migrations_dir() -> PathBuf {
    std::env::var(MIGRATIONS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations"))
}

/// Apply every pending migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrationError> {
    let dir = migrations_dir();
    let migrator = Migrator::new(dir.clone())
        .await
        .map_err(|source| MigrationError::Load {
            path: dir.display().to_string(),
            source,
        })?;

    migrator.run(pool).await?;
    info!(path = %dir.display(), "Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_migrations_dir() {
        if std::env::var(MIGRATIONS_DIR_ENV).is_err() {
            let dir = migrations_dir();
            assert!(dir.ends_with("migrations"));
            assert!(dir.exists());
        }
    }
}
