//! PostgreSQL implementation of CategoryRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use market_core::entities::{Category, Subcategory};
use market_core::traits::{CategoryRepository, RepoResult};

use crate::models::{CategoryModel, SubcategoryModel};

use super::error::map_db_error;

/// PostgreSQL implementation of CategoryRepository
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT id, name, slug, sort_order, is_active
            FROM categories
            WHERE is_active
            ORDER BY sort_order ASC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_subcategories(&self) -> RepoResult<Vec<Subcategory>> {
        let rows = sqlx::query_as::<_, SubcategoryModel>(
            r#"
            SELECT id, category_id, name, slug
            FROM subcategories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Subcategory::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_category_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryModel>(
            r#"
            SELECT id, name, slug, sort_order, is_active
            FROM categories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Category::from))
    }

    #[instrument(skip(self))]
    async fn find_subcategory_by_slug(&self, slug: &str) -> RepoResult<Option<Subcategory>> {
        let row = sqlx::query_as::<_, SubcategoryModel>(
            r#"
            SELECT id, category_id, name, slug
            FROM subcategories
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(Subcategory::from))
    }
}
