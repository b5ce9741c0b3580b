//! PostgreSQL implementation of ListingViewRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use market_core::error::DomainError;
use market_core::traits::{ListingViewRepository, RepoResult};
use market_core::value_objects::Viewer;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgListingViewRepository {
    pool: PgPool,
}

impl PgListingViewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingViewRepository for PgListingViewRepository {
    #[instrument(skip(self, viewer))]
    async fn record(&self, listing_id: Uuid, viewer: &Viewer) -> RepoResult<i64> {
        let (user_id, session_id) = match viewer {
            Viewer::User(id) => (Some(*id), None),
            Viewer::Session(session) => (None, Some(session.as_str())),
        };

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock the listing row so concurrent first views serialize
        let current: Option<i64> =
            sqlx::query_scalar("SELECT views FROM listings WHERE id = $1 FOR UPDATE")
                .bind(listing_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;
        let Some(current) = current else {
            return Err(DomainError::ListingNotFound(listing_id));
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO listing_views (id, listing_id, user_id, session_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(listing_id)
        .bind(user_id)
        .bind(session_id)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            > 0;

        // Only a first view from this viewer moves the counter
        let views = if inserted {
            sqlx::query_scalar("UPDATE listings SET views = views + 1 WHERE id = $1 RETURNING views")
                .bind(listing_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(map_db_error)?
        } else {
            current
        };

        tx.commit().await.map_err(map_db_error)?;
        Ok(views)
    }

    #[instrument(skip(self))]
    async fn count(&self, listing_id: Uuid) -> RepoResult<Option<i64>> {
        let views: Option<i64> = sqlx::query_scalar("SELECT views FROM listings WHERE id = $1")
            .bind(listing_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(views)
    }
}
