//! # market-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `market-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use market_db::{create_pool, run_migrations, DatabaseConfig, PgListingRepository};
//! use market_core::traits::ListingRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let listings = PgListingRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ping, run_migrations, DatabaseConfig, MigrationError, PgPool};
pub use repositories::{
    PgAttachmentRepository, PgBidRepository, PgCategoryRepository, PgConversationReadRepository,
    PgConversationRepository, PgFavoriteRepository, PgListingRepository, PgListingViewRepository,
    PgMessageRepository, PgProfileRepository, PgReviewRepository,
};
