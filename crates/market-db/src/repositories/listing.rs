//! PostgreSQL implementation of ListingRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use market_core::entities::{Listing, ListingStatus};
use market_core::error::DomainError;
use market_core::traits::{
    ListingBrowseQuery, ListingRepository, ListingSearchQuery, RepoResult, SellerFilter,
};
use market_core::value_objects::search::contains_pattern;

use crate::mappers::ListingInsert;
use crate::models::ListingModel;

use super::error::map_db_error;

pub(super) const LISTING_COLUMNS: &str = "id, seller_id, title, description, price, location, state, \
     allow_offers, images, main_photo, category_id, subcategory_id, categories, \
     is_business_seller, status, created_at, updated_at";

/// PostgreSQL implementation of ListingRepository
#[derive(Clone)]
pub struct PgListingRepository {
    pool: PgPool,
}

impl PgListingRepository {
    /// Create a new PgListingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `(category_id = id OR id = ANY(categories))`
fn push_category_match(qb: &mut QueryBuilder<'_, Postgres>, column: &str, id: i64) {
    qb.push(" AND (")
        .push(column)
        .push(" = ")
        .push_bind(id)
        .push(" OR ")
        .push_bind(id)
        .push(" = ANY(categories))");
}

fn push_browse_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ListingBrowseQuery) {
    qb.push(" WHERE status = ")
        .push_bind(ListingStatus::Active.db_value());

    if let Some(pattern) = query.q.as_deref().and_then(contains_pattern) {
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(id) = query.category_id {
        push_category_match(qb, "category_id", id);
    }
    if let Some(id) = query.subcategory_id {
        push_category_match(qb, "subcategory_id", id);
    }
}

fn push_search_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &ListingSearchQuery) {
    qb.push(" WHERE TRUE");

    if let Some(status) = query.status {
        qb.push(" AND status = ").push_bind(status.db_value());
    }

    let patterns: Vec<String> = query.terms.iter().filter_map(|t| contains_pattern(t)).collect();
    if !patterns.is_empty() {
        qb.push(" AND (title ILIKE ANY(")
            .push_bind(patterns.clone())
            .push(") OR description ILIKE ANY(")
            .push_bind(patterns)
            .push("))");
    }

    if let Some(id) = query.category_id {
        qb.push(" AND (category_id = ")
            .push_bind(id)
            .push(" OR subcategory_id = ")
            .push_bind(id)
            .push(" OR ")
            .push_bind(id)
            .push(" = ANY(categories))");
    }
    if let Some(id) = query.subcategory_id {
        push_category_match(qb, "subcategory_id", id);
    }
    if let Some(min) = query.price_min {
        qb.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = query.price_max {
        qb.push(" AND price <= ").push_bind(max);
    }
    if let Some(state) = &query.state {
        qb.push(" AND state = ").push_bind(state.clone());
    }
    if let Some(pattern) = query.location.as_deref().and_then(contains_pattern) {
        qb.push(" AND location ILIKE ").push_bind(pattern);
    }
    match query.sellers {
        SellerFilter::Any => {}
        SellerFilter::BusinessOnly => {
            qb.push(" AND is_business_seller = TRUE");
        }
        SellerFilter::ExcludeBusiness => {
            qb.push(" AND is_business_seller = FALSE");
        }
    }
}

#[async_trait]
impl ListingRepository for PgListingRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Listing>> {
        let result = sqlx::query_as::<_, ListingModel>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Listing::from))
    }

    #[instrument(skip(self, listing), fields(listing_id = %listing.id))]
    async fn create(&self, listing: &Listing) -> RepoResult<()> {
        let insert = ListingInsert::new(listing);

        sqlx::query(
            r#"
            INSERT INTO listings (
                id, seller_id, title, description, price, location, state, allow_offers,
                images, main_photo, category_id, subcategory_id, categories,
                is_business_seller, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(insert.id)
        .bind(insert.seller_id)
        .bind(insert.title)
        .bind(insert.description)
        .bind(insert.price)
        .bind(insert.location)
        .bind(insert.state)
        .bind(insert.allow_offers)
        .bind(insert.images)
        .bind(insert.main_photo)
        .bind(insert.category_id)
        .bind(insert.subcategory_id)
        .bind(&insert.categories)
        .bind(insert.is_business_seller)
        .bind(insert.status)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, listing), fields(listing_id = %listing.id))]
    async fn update(&self, listing: &Listing) -> RepoResult<()> {
        let insert = ListingInsert::new(listing);

        let result = sqlx::query(
            r#"
            UPDATE listings
            SET title = $2, description = $3, price = $4, location = $5, state = $6,
                allow_offers = $7, images = $8, main_photo = $9, category_id = $10,
                subcategory_id = $11, categories = $12, status = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(insert.id)
        .bind(insert.title)
        .bind(insert.description)
        .bind(insert.price)
        .bind(insert.location)
        .bind(insert.state)
        .bind(insert.allow_offers)
        .bind(insert.images)
        .bind(insert.main_photo)
        .bind(insert.category_id)
        .bind(insert.subcategory_id)
        .bind(&insert.categories)
        .bind(insert.status)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ListingNotFound(listing.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ListingNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn browse(&self, query: &ListingBrowseQuery) -> RepoResult<(Vec<Listing>, Option<i64>)> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {LISTING_COLUMNS} FROM listings"));
        push_browse_filters(&mut qb, query);
        qb.push(" ORDER BY ")
            .push(query.sort.order_by())
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit))
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let rows = qb
            .build_query_as::<ListingModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let total = if query.with_count {
            let mut count_qb: QueryBuilder<'_, Postgres> =
                QueryBuilder::new("SELECT COUNT(*) FROM listings");
            push_browse_filters(&mut count_qb, query);
            let total: i64 = count_qb
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;
            Some(total)
        } else {
            None
        };

        Ok((rows.into_iter().map(Listing::from).collect(), total))
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &ListingSearchQuery) -> RepoResult<(Vec<Listing>, i64)> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {LISTING_COLUMNS} FROM listings"));
        push_search_filters(&mut qb, query);
        qb.push(" ORDER BY ")
            .push(query.sort.order_by())
            .push(" LIMIT ")
            .push_bind(i64::from(query.page.limit))
            .push(" OFFSET ")
            .push_bind(query.page.offset());

        let rows = qb
            .build_query_as::<ListingModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut count_qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM listings");
        push_search_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok((rows.into_iter().map(Listing::from).collect(), total))
    }

    #[instrument(skip(self, terms), fields(terms = terms.len()))]
    async fn suggest_titles(&self, terms: &[String], limit: i64) -> RepoResult<Vec<String>> {
        let patterns: Vec<String> = terms.iter().filter_map(|t| contains_pattern(t)).collect();
        if patterns.is_empty() {
            return Ok(Vec::new());
        }

        let titles: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT title
            FROM listings
            WHERE status = $1 AND title ILIKE ANY($2)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(ListingStatus::Active.db_value())
        .bind(&patterns)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(titles)
    }

    #[instrument(skip(self))]
    async fn seller_ids_by_title(&self, pattern: &str) -> RepoResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT seller_id
            FROM listings
            WHERE status = $1 AND title ILIKE $2
            "#,
        )
        .bind(ListingStatus::Active.db_value())
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn active_by_seller(&self, seller_id: Uuid, limit: i64) -> RepoResult<Vec<Listing>> {
        let rows = sqlx::query_as::<_, ListingModel>(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings \
             WHERE seller_id = $1 AND status = $2 \
             ORDER BY created_at DESC LIMIT $3"
        ))
        .bind(seller_id)
        .bind(ListingStatus::Active.db_value())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Listing::from).collect())
    }
}
