//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::Profile;
use market_core::error::DomainError;
use market_core::traits::{BusinessProfileQuery, ProfileRepository, RepoResult};
use market_core::value_objects::Usage;

use crate::models::{ProfileModel, UsageModel};

use super::error::map_db_error;

const PROFILE_COLUMNS: &str = "id, full_name, shop_name, company_name, avatar_url, \
     business_logo_url, is_business, business_plan, business, categories, city, address, \
     invoice_address, rating, avg_rating, review_count, stripe_account_id, created_at";

/// PostgreSQL implementation of ProfileRepository
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new PgProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Profile>> {
        let result = sqlx::query_as::<_, ProfileModel>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Profile::from))
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[Uuid]) -> RepoResult<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, ProfileModel>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Profile::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_businesses(&self, query: &BusinessProfileQuery) -> RepoResult<Vec<Profile>> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles \
             WHERE (is_business OR COALESCE(btrim(business_plan), '') <> '')"
        ));

        if let Some(pattern) = &query.name_pattern {
            qb.push(" AND (company_name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR shop_name ILIKE ")
                .push_bind(pattern.clone())
                .push(")");
        }
        if let Some(ids) = &query.ids {
            qb.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
        }

        let results = qb
            .build_query_as::<ProfileModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(results.into_iter().map(Profile::from).collect())
    }

    #[instrument(skip(self))]
    async fn set_payment_account(&self, id: Uuid, account_id: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET stripe_account_id = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(account_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ProfileNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn usage(&self, id: Uuid) -> RepoResult<Usage> {
        let usage = sqlx::query_as::<_, UsageModel>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM listings
                 WHERE seller_id = $1 AND status = 'actief') AS active_listings,
                (SELECT COUNT(*) FROM listings
                 WHERE seller_id = $1 AND boosted_until > NOW()) AS active_boosts,
                (SELECT COUNT(*) FROM qr_credit_usage
                 WHERE user_id = $1 AND used_at >= date_trunc('month', NOW())) AS qr_credits_used_this_month
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Usage::from(usage))
    }
}
