//! PostgreSQL implementation of FavoriteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::Listing;
use market_core::traits::{FavoriteRepository, RepoResult};

use crate::models::ListingModel;

use super::error::map_db_error;
use super::listing::LISTING_COLUMNS;

#[derive(Clone)]
pub struct PgFavoriteRepository {
    pool: PgPool,
}

impl PgFavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for PgFavoriteRepository {
    #[instrument(skip(self))]
    async fn add(&self, user_id: Uuid, listing_id: Uuid) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO favorites (user_id, listing_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, listing_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(listing_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, user_id: Uuid, listing_id: Uuid) -> RepoResult<()> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND listing_id = $2")
            .bind(user_id)
            .bind(listing_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn exists(&self, user_id: Uuid, listing_id: Uuid) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND listing_id = $2)",
        )
        .bind(user_id)
        .bind(listing_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }

    #[instrument(skip(self))]
    async fn count_for_listing(&self, listing_id: Uuid) -> RepoResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM favorites WHERE listing_id = $1")
            .bind(listing_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn listings_for_user(&self, user_id: Uuid) -> RepoResult<Vec<Listing>> {
        // favorites has no column that collides with LISTING_COLUMNS
        let rows = sqlx::query_as::<_, ListingModel>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings \
             JOIN favorites ON favorites.listing_id = listings.id \
             WHERE favorites.user_id = $1 \
             ORDER BY favorites.favorited_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Listing::from).collect())
    }
}
