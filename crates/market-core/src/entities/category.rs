//! Category tree entities

/// Top-level category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Subcategory belonging to a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subcategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub slug: String,
}

impl Category {
    pub fn new(id: i64, name: String, slug: String) -> Self {
        Self {
            id,
            name,
            slug,
            sort_order: 0,
            is_active: true,
        }
    }
}
