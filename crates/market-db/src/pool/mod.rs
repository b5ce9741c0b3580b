//! Database connection pool management

mod migrate;
mod postgres;

pub use migrate::{run_migrations, MigrationError};
pub use postgres::{create_pool, ping, DatabaseConfig};

pub use sqlx::postgres::PgPool;
