//! PostgreSQL implementation of BidRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::{Bid, BidWithBidder};
use market_core::traits::{BidRepository, RepoResult};

use crate::models::BidWithBidderModel;

use super::error::map_db_error;

/// PostgreSQL implementation of BidRepository
#[derive(Clone)]
pub struct PgBidRepository {
    pool: PgPool,
}

impl PgBidRepository {
    /// Create a new PgBidRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BidRepository for PgBidRepository {
    #[instrument(skip(self, bid), fields(bid_id = %bid.id, listing_id = %bid.listing_id))]
    async fn create(&self, bid: &Bid) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bids (id, listing_id, bidder_id, amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(bid.id)
        .bind(bid.listing_id)
        .bind(bid.bidder_id)
        .bind(bid.amount)
        .bind(bid.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_for_listing(&self, listing_id: Uuid) -> RepoResult<Vec<BidWithBidder>> {
        let rows = sqlx::query_as::<_, BidWithBidderModel>(
            r#"
            SELECT b.id, b.listing_id, b.bidder_id, b.amount, b.created_at,
                   p.full_name AS bidder_name
            FROM bids b
            LEFT JOIN profiles p ON p.id = b.bidder_id
            WHERE b.listing_id = $1
            ORDER BY b.amount DESC, b.created_at DESC
            "#,
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(BidWithBidder::from).collect())
    }

    #[instrument(skip(self))]
    async fn summary(&self, listing_id: Uuid) -> RepoResult<(Option<f64>, i64)> {
        let summary: (Option<f64>, i64) = sqlx::query_as(
            r#"
            SELECT MAX(amount), COUNT(*)
            FROM bids
            WHERE listing_id = $1
            "#,
        )
        .bind(listing_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(summary)
    }
}
