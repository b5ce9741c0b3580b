//! Category entity <-> model mapper

use market_core::entities::{Category, Subcategory};

use crate::models::{CategoryModel, SubcategoryModel};

impl From<CategoryModel> for Category {
    fn from(model: CategoryModel) -> Self {
        Category {
            id: model.id,
            name: model.name,
            slug: model.slug,
            sort_order: model.sort_order,
            is_active: model.is_active,
        }
    }
}

impl From<SubcategoryModel> for Subcategory {
    fn from(model: SubcategoryModel) -> Self {
        Subcategory {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            slug: model.slug,
        }
    }
}
