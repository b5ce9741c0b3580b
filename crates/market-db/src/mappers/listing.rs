//! Listing entity <-> model mapper

use market_core::entities::{Listing, ListingStatus};
use uuid::Uuid;

use crate::models::ListingModel;

/// Convert ListingModel to Listing entity
impl From<ListingModel> for Listing {
    fn from(model: ListingModel) -> Self {
        Listing {
            id: model.id,
            seller_id: model.seller_id,
            title: model.title,
            description: model.description,
            price: model.price,
            location: model.location,
            state: model.state,
            allow_offers: model.allow_offers,
            images: model.images,
            main_photo: model.main_photo,
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            categories: model.categories,
            is_business_seller: model.is_business_seller,
            // Column is constrained; unknown values only appear with manual edits
            status: ListingStatus::from_db(&model.status).unwrap_or(ListingStatus::Draft),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Listing values for insert and full update
pub struct ListingInsert<'a> {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub price: Option<f64>,
    pub location: Option<&'a str>,
    pub state: Option<&'a str>,
    pub allow_offers: bool,
    pub images: &'a [String],
    pub main_photo: Option<&'a str>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub categories: Vec<i64>,
    pub is_business_seller: bool,
    pub status: &'static str,
}

impl<'a> ListingInsert<'a> {
    pub fn new(listing: &'a Listing) -> Self {
        // Keep the legacy id list in step with the explicit columns
        let mut categories = listing.categories.clone();
        for id in [listing.category_id, listing.subcategory_id].into_iter().flatten() {
            if !categories.contains(&id) {
                categories.push(id);
            }
        }

        Self {
            id: listing.id,
            seller_id: listing.seller_id,
            title: &listing.title,
            description: listing.description.as_deref(),
            price: listing.price,
            location: listing.location.as_deref(),
            state: listing.state.as_deref(),
            allow_offers: listing.allow_offers,
            images: &listing.images,
            main_photo: listing.main_photo.as_deref(),
            category_id: listing.category_id,
            subcategory_id: listing.subcategory_id,
            categories,
            is_business_seller: listing.is_business_seller,
            status: listing.status.db_value(),
        }
    }
}
