//! Category database models

use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CategoryModel {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct SubcategoryModel {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
}
