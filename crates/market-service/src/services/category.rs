//! Category service

use tracing::instrument;

use crate::dto::CategoryResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Category service
pub struct CategoryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CategoryService<'a> {
    /// Create a new CategoryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Active categories, each with its subcategories
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<CategoryResponse>> {
        let repo = self.ctx.category_repo();
        let categories = repo.list_categories().await?;
        let subcategories = repo.list_subcategories().await?;

        Ok(categories
            .iter()
            .map(|c| CategoryResponse::with_subcategories(c, &subcategories))
            .collect())
    }
}
