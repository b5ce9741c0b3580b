//! Listing database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for listings table
#[derive(Debug, Clone, FromRow)]
pub struct ListingModel {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub state: Option<String>,
    pub allow_offers: bool,
    pub images: Vec<String>,
    pub main_photo: Option<String>,
    pub category_id: Option<i64>,
    pub subcategory_id: Option<i64>,
    pub categories: Vec<i64>,
    pub is_business_seller: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
