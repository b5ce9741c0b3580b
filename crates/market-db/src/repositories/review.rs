//! PostgreSQL implementation of ReviewRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::{Review, ReviewTarget, ReviewWithAuthor};
use market_core::error::DomainError;
use market_core::traits::{RepoResult, ReviewRepository};

use crate::mappers::ReviewTargetColumns;
use crate::models::{RatingRowModel, ReviewModel, ReviewWithAuthorModel};

use super::error::{map_db_error, map_unique_violation};

/// PostgreSQL implementation of ReviewRepository
#[derive(Clone)]
pub struct PgReviewRepository {
    pool: PgPool,
}

impl PgReviewRepository {
    /// Create a new PgReviewRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    #[instrument(skip(self, review), fields(review_id = %review.id))]
    async fn insert(&self, review: &Review) -> RepoResult<()> {
        let target = ReviewTargetColumns::from(review.target);

        sqlx::query(
            r#"
            INSERT INTO reviews (id, listing_id, business_id, author_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(review.id)
        .bind(target.listing_id)
        .bind(target.business_id)
        .bind(review.author_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::ReviewAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self, comment))]
    async fn update_existing(
        &self,
        target: ReviewTarget,
        author_id: Uuid,
        rating: i16,
        comment: &str,
    ) -> RepoResult<Option<Review>> {
        let columns = ReviewTargetColumns::from(target);

        let result = sqlx::query_as::<_, ReviewModel>(
            r#"
            UPDATE reviews
            SET rating = $4, comment = $5
            WHERE author_id = $1
              AND listing_id IS NOT DISTINCT FROM $2
              AND business_id IS NOT DISTINCT FROM $3
            RETURNING id, listing_id, business_id, author_id, rating, comment, created_at
            "#,
        )
        .bind(author_id)
        .bind(columns.listing_id)
        .bind(columns.business_id)
        .bind(rating)
        .bind(comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Review::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_with_author(&self, id: Uuid) -> RepoResult<Option<ReviewWithAuthor>> {
        let result = sqlx::query_as::<_, ReviewWithAuthorModel>(
            r#"
            SELECT r.id, r.listing_id, r.business_id, r.author_id, r.rating, r.comment, r.created_at,
                   p.full_name AS author_name, p.avatar_url AS author_avatar
            FROM reviews r
            LEFT JOIN profiles p ON p.id = r.author_id
            WHERE r.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(ReviewWithAuthor::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_for_target(&self, target: ReviewTarget, limit: i64) -> RepoResult<Vec<ReviewWithAuthor>> {
        let columns = ReviewTargetColumns::from(target);

        let rows = sqlx::query_as::<_, ReviewWithAuthorModel>(
            r#"
            SELECT r.id, r.listing_id, r.business_id, r.author_id, r.rating, r.comment, r.created_at,
                   p.full_name AS author_name, p.avatar_url AS author_avatar
            FROM reviews r
            LEFT JOIN profiles p ON p.id = r.author_id
            WHERE r.listing_id IS NOT DISTINCT FROM $1
              AND r.business_id IS NOT DISTINCT FROM $2
            ORDER BY r.created_at DESC
            LIMIT $3
            "#,
        )
        .bind(columns.listing_id)
        .bind(columns.business_id)
        .bind(limit.max(1))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(ReviewWithAuthor::try_from).collect()
    }

    #[instrument(skip(self, business_ids), fields(count = business_ids.len()))]
    async fn business_rating_rows(&self, business_ids: &[Uuid]) -> RepoResult<Vec<(Uuid, i16)>> {
        if business_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, RatingRowModel>(
            r#"
            SELECT business_id, rating
            FROM reviews
            WHERE business_id = ANY($1)
            "#,
        )
        .bind(business_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(|r| (r.business_id, r.rating)).collect())
    }
}
